//! # Record Sources
//!
//! A [`RecordSource`] supplies one [`ResumeRecord`] per role name. The rest of
//! the application only ever asks a source for a record and never cares where
//! it came from.
//!
//! ## Implementations
//!
//! - [`yaml::YamlSource`]: production source. One tagged YAML document holds
//!   every bullet, entry and skill group; each role gets the subset tagged for it.
//!   See [`tagged`] for the document format and the selection rules.
//! - [`memory::InMemorySource`]: fixed records keyed by role, for tests.
//!
//! Unknown roles fail with [`ResumeError::NotFound`](crate::error::ResumeError::NotFound).

use crate::error::Result;
use crate::model::ResumeRecord;

pub mod memory;
pub mod tagged;
pub mod yaml;

/// Role name that selects every item regardless of tags.
pub const ALL_ROLES: &str = "all";

pub trait RecordSource {
    /// Role names this source can produce records for, in a stable order.
    fn roles(&self) -> Vec<String>;

    /// Builds the record for `role`.
    fn get_record(&self, role: &str) -> Result<ResumeRecord>;

    /// Tags used in the data that name no known role. Usually typos.
    fn unknown_tags(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Lowercases and trims a role name as typed by the user.
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}
