use crate::error::{ResumeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use stencil::Undefined;

pub const CONFIG_FILENAME: &str = "resumegen.json";
const DEFAULT_FILE_EXT: &str = ".md";

pub const DEFAULT_ROLES: [&str; 9] = [
    "python",
    "java",
    "fullstack",
    "backend",
    "frontend",
    "cloud",
    "devops",
    "mobile",
    "all",
];

/// How the template treats references to data that is not there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedPolicy {
    #[default]
    Strict,
    Lenient,
}

impl From<UndefinedPolicy> for Undefined {
    fn from(policy: UndefinedPolicy) -> Self {
        match policy {
            UndefinedPolicy::Strict => Undefined::Strict,
            UndefinedPolicy::Lenient => Undefined::Lenient,
        }
    }
}

/// Project configuration, stored in `resumegen.json`.
///
/// Relative paths are resolved against the project directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResumegenConfig {
    /// Tagged YAML resume data
    pub data_path: PathBuf,
    /// Template rendered once per role
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    /// Output files are named `<file_prefix><role><file_ext>`
    pub file_prefix: String,
    pub file_ext: String,
    /// Role names accepted by `build`; anything else is not found
    pub roles: Vec<String>,
    pub undefined: UndefinedPolicy,
}

impl Default for ResumegenConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/resume.yaml"),
            template_path: PathBuf::from("templates/resume.md"),
            output_dir: PathBuf::from("outputs"),
            file_prefix: "resume_".to_string(),
            file_ext: DEFAULT_FILE_EXT.to_string(),
            roles: DEFAULT_ROLES.iter().map(|r| r.to_string()).collect(),
            undefined: UndefinedPolicy::Strict,
        }
    }
}

impl ResumegenConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ResumeError::Io)?;
        let mut config: ResumegenConfig =
            serde_json::from_str(&content).map_err(ResumeError::Serialization)?;
        let ext = config.file_ext.clone();
        config.set_file_ext(&ext);
        config.validate()?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ResumeError::Io)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(ResumeError::Serialization)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content + "\n").map_err(ResumeError::Io)?;
        Ok(())
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.is_empty() || ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }

    fn validate(&self) -> Result<()> {
        if self.roles.is_empty() {
            return Err(ResumeError::Config("`roles` must list at least one role".into()));
        }
        if let Some(role) = self
            .roles
            .iter()
            .find(|r| r.trim().is_empty() || r.contains(['/', '\\']))
        {
            return Err(ResumeError::Config(format!(
                "invalid role name {:?}: roles become file names",
                role
            )));
        }
        Ok(())
    }

    pub fn data_path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.data_path)
    }

    pub fn template_path_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.template_path)
    }

    pub fn output_dir_in(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.output_dir)
    }
}
