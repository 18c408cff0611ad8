use super::render::render_role;
use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::output::OutputWriter;
use crate::source::{normalize_role, RecordSource};
use std::path::PathBuf;
use tracing::{info, warn};

/// Renders and writes one document per role.
///
/// Each role is rendered completely in memory before anything is written, and
/// a failing role is recorded in the report while the remaining roles still run.
pub fn run<S: RecordSource, R: AsRef<str>>(
    source: &S,
    renderer: &stencil::Renderer,
    writer: &OutputWriter,
    roles: &[R],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for role in roles {
        let role = normalize_role(role.as_ref());
        match build_one(source, renderer, writer, &role) {
            Ok(path) => {
                info!(role = %role, path = %path.display(), "built resume");
                result.add_message(CmdMessage::success(format!(
                    "Generated {} resume: {}",
                    role,
                    path.display()
                )));
                result.report.succeeded.push((role, path));
            }
            Err(e) => {
                warn!(role = %role, error = %e, "resume build failed");
                result.add_message(CmdMessage::error(format!("{}: {}", role, e)));
                result.report.failed.push((role, e));
            }
        }
    }

    if !result.report.failed.is_empty() && !result.report.succeeded.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "{} of {} roles failed: {}",
            result.report.failed.len(),
            roles.len(),
            result.report.failed_roles().join(", ")
        )));
    }
    Ok(result)
}

fn build_one<S: RecordSource>(
    source: &S,
    renderer: &stencil::Renderer,
    writer: &OutputWriter,
    role: &str,
) -> Result<PathBuf> {
    let document = render_role(source, renderer, role)?;
    writer.write(role, &document)
}
