use super::{CmdMessage, CmdResult};
use crate::config::{ResumegenConfig, CONFIG_FILENAME};
use crate::error::{ResumeError, Result};
use std::fs;
use std::path::Path;

const SAMPLE_DATA: &str = include_str!("../assets/resume.yaml");
const SAMPLE_TEMPLATE: &str = include_str!("../assets/resume.md");

/// Scaffolds a project: config, sample data and the default template.
///
/// Existing files are left alone unless `force` is set.
pub fn run(project_dir: &Path, force: bool) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let config = ResumegenConfig::default();

    let config_path = project_dir.join(CONFIG_FILENAME);
    if config_path.exists() && !force {
        result.add_message(CmdMessage::info(format!(
            "Kept existing {}",
            config_path.display()
        )));
    } else {
        config.save(project_dir)?;
        result.created_files.push(config_path);
    }

    let files = [
        (config.data_path_in(project_dir), SAMPLE_DATA),
        (config.template_path_in(project_dir), SAMPLE_TEMPLATE),
    ];
    for (path, contents) in files {
        if path.exists() && !force {
            result.add_message(CmdMessage::info(format!("Kept existing {}", path.display())));
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ResumeError::Io)?;
        }
        fs::write(&path, contents).map_err(ResumeError::Io)?;
        result.created_files.push(path);
    }

    for path in &result.created_files {
        result.messages.push(CmdMessage::success(format!("Created {}", path.display())));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::tagged::ResumeDocument;

    #[test]
    fn test_init_creates_project() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), false).unwrap();

        assert_eq!(result.created_files.len(), 3);
        assert!(dir.path().join("resumegen.json").exists());
        assert!(dir.path().join("data/resume.yaml").exists());
        assert!(dir.path().join("templates/resume.md").exists());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/resume.md"), "mine").unwrap();

        let result = run(dir.path(), false).unwrap();
        assert_eq!(result.created_files.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("templates/resume.md")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), false).unwrap();
        fs::write(dir.path().join("templates/resume.md"), "mine").unwrap();

        let result = run(dir.path(), true).unwrap();
        assert_eq!(result.created_files.len(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("templates/resume.md")).unwrap(),
            SAMPLE_TEMPLATE
        );
    }

    #[test]
    fn test_sample_assets_are_valid() {
        ResumeDocument::from_yaml(SAMPLE_DATA).unwrap();
        stencil::Template::parse(SAMPLE_TEMPLATE).unwrap();
    }
}
