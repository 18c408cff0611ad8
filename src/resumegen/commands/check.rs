use super::{CmdMessage, CmdResult, TEMPLATE_NAME};
use crate::error::Result;
use crate::model::ResumeRecord;
use crate::output::OutputWriter;
use crate::source::RecordSource;
use tracing::debug;

/// Renders every role the source knows without writing anything.
///
/// Successful roles are reported with the path `build` would write them to.
/// Roles that render but select no content, and tags that match no role, are
/// flagged with warnings.
pub fn run<S: RecordSource>(
    source: &S,
    renderer: &stencil::Renderer,
    writer: &OutputWriter,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    for tag in source.unknown_tags() {
        result.add_message(CmdMessage::warning(format!(
            "tag `{}` is not a configured role; items tagged only with it are never rendered",
            tag
        )));
    }

    for role in source.roles() {
        let checked = source.get_record(&role).and_then(|record| {
            renderer.render(TEMPLATE_NAME, &record)?;
            Ok(record)
        });

        match checked {
            Ok(record) => {
                debug!(role = %role, "role renders");
                if let Some(warning) = empty_sections(&record) {
                    result.add_message(CmdMessage::warning(format!("{}: {}", role, warning)));
                }
                result.add_message(CmdMessage::info(format!("{}: ok", role)));
                let path = writer.path_for(&role);
                result.report.succeeded.push((role, path));
            }
            Err(e) => {
                result.add_message(CmdMessage::error(format!("{}: {}", role, e)));
                result.report.failed.push((role, e));
            }
        }
    }

    if result.report.failed.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "All {} roles render",
            result.report.succeeded.len()
        )));
    }
    Ok(result)
}

fn empty_sections(record: &ResumeRecord) -> Option<String> {
    let mut empty = Vec::new();
    if record.summary.is_empty() {
        empty.push("summary");
    }
    if record.experience.is_empty() {
        empty.push("experience");
    }
    if record.projects.is_empty() {
        empty.push("projects");
    }
    if empty.is_empty() {
        None
    } else {
        Some(format!("no {} selected", empty.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::render::renderer_config;
    use crate::commands::MessageLevel;
    use crate::config::UndefinedPolicy;
    use crate::model::{ExperienceEntry, ProjectEntry};
    use crate::source::memory::InMemorySource;

    fn renderer(template: &str) -> stencil::Renderer {
        let mut renderer = stencil::Renderer::new(renderer_config(UndefinedPolicy::Strict));
        renderer.add_template(TEMPLATE_NAME, template).unwrap();
        renderer
    }

    fn full_record() -> ResumeRecord {
        ResumeRecord {
            name: "Ada".into(),
            summary: vec!["Built X".into()],
            experience: vec![ExperienceEntry {
                company: "Acme".into(),
                ..Default::default()
            }],
            projects: vec![ProjectEntry {
                name: "Engine".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_check_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().join("outputs"));
        let source = InMemorySource::new().with_record("python", full_record());

        let result = run(&source, &renderer("{{ name }}"), &writer).unwrap();

        assert!(result.is_success());
        assert_eq!(result.report.succeeded_roles(), vec!["python"]);
        assert_eq!(
            result.report.succeeded[0].1,
            dir.path().join("outputs/resume_python.md")
        );
        assert!(!dir.path().join("outputs").exists());
        assert!(result
            .messages
            .iter()
            .all(|m| m.level != MessageLevel::Warning));
    }

    #[test]
    fn test_check_reports_failures_per_role() {
        let writer = OutputWriter::new("unused");
        let source = InMemorySource::new()
            .with_record("python", full_record())
            .with_record(
                "java",
                ResumeRecord {
                    summary: vec!["x".into()],
                    ..Default::default()
                },
            );

        // Only records with projects reach the undefined attribute.
        let template = "{% for p in projects %}{{ p.name }}{{ p.missing }}{% endfor %}";
        let result = run(&source, &renderer(template), &writer).unwrap();
        assert_eq!(result.report.succeeded_roles(), vec!["java"]);
        assert_eq!(result.report.failed_roles(), vec!["python"]);
        assert!(!result.is_success());
    }

    #[test]
    fn test_check_warns_on_empty_sections() {
        let writer = OutputWriter::new("unused");
        let source = InMemorySource::new().with_record(
            "mobile",
            ResumeRecord {
                name: "Ada".into(),
                summary: vec!["Built X".into()],
                ..Default::default()
            },
        );

        let result = run(&source, &renderer("{{ name }}"), &writer).unwrap();
        assert!(result.is_success());
        let warning = result
            .messages
            .iter()
            .find(|m| m.level == MessageLevel::Warning)
            .unwrap();
        assert_eq!(warning.content, "mobile: no experience, projects selected");
    }
}
