use super::tagged::ResumeDocument;
use super::{normalize_role, RecordSource, ALL_ROLES};
use crate::error::{ResumeError, Result};
use crate::model::ResumeRecord;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serves records from a tagged YAML resume document.
///
/// The document is read and validated once, when the source is opened; each
/// record is then derived from it without touching the filesystem again.
pub struct YamlSource {
    document: ResumeDocument,
    roles: Vec<String>,
}

impl YamlSource {
    /// Opens the document at `path`, serving the given role names.
    pub fn open<P: AsRef<Path>>(path: P, roles: &[String]) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading resume data");
        let content = fs::read_to_string(path).map_err(ResumeError::Io)?;
        Ok(Self::from_document(ResumeDocument::from_yaml(&content)?, roles))
    }

    pub fn from_document(document: ResumeDocument, roles: &[String]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(roles.len());
        for role in roles.iter().map(|r| normalize_role(r)) {
            if !normalized.contains(&role) {
                normalized.push(role);
            }
        }
        Self {
            document,
            roles: normalized,
        }
    }
}

impl RecordSource for YamlSource {
    fn roles(&self) -> Vec<String> {
        self.roles.clone()
    }

    fn unknown_tags(&self) -> Vec<String> {
        self.document
            .roles_mentioned()
            .into_iter()
            .filter(|tag| tag != ALL_ROLES && !self.roles.contains(tag))
            .collect()
    }

    fn get_record(&self, role: &str) -> Result<ResumeRecord> {
        let role = normalize_role(role);
        if !self.roles.contains(&role) {
            return Err(ResumeError::NotFound(role));
        }
        let record = self.document.select(&role);
        debug!(
            role = %role,
            summary = record.summary.len(),
            experience = record.experience.len(),
            skills = record.skills.len(),
            "selected record"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "name: Ada\ntitle: Engineer\nemail: a@b.c\nlinkedin: li\ngithub: gh\nsummary:\n  - text: Pythonic\n    tags: [python]\n";

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_open_and_select() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.yaml");
        fs::write(&path, DOC).unwrap();

        let source = YamlSource::open(&path, &roles(&["python", "java"])).unwrap();
        assert_eq!(source.roles(), roles(&["python", "java"]));

        let record = source.get_record("Python").unwrap();
        assert_eq!(record.role, "python");
        assert_eq!(record.summary, vec!["Pythonic"]);

        let record = source.get_record("java").unwrap();
        assert!(record.summary.is_empty());
    }

    #[test]
    fn test_unknown_role_not_found() {
        let document = ResumeDocument::from_yaml(DOC).unwrap();
        let source = YamlSource::from_document(document, &roles(&["python"]));
        match source.get_record("unknown") {
            Err(ResumeError::NotFound(role)) => assert_eq!(role, "unknown"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_roles_are_normalized_and_deduplicated() {
        let document = ResumeDocument::from_yaml(DOC).unwrap();
        let source = YamlSource::from_document(document, &roles(&["Python", "python ", "ALL"]));
        assert_eq!(source.roles(), roles(&["python", "all"]));
    }

    #[test]
    fn test_unknown_tags() {
        let document = ResumeDocument::from_yaml(
            "name: Ada\ntitle: Engineer\nemail: a@b.c\nlinkedin: li\ngithub: gh\nsummary:\n  - text: A\n    tags: [python, pyhton, all]\n",
        )
        .unwrap();
        let source = YamlSource::from_document(document, &roles(&["python"]));
        assert_eq!(source.unknown_tags(), roles(&["pyhton"]));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = YamlSource::open(dir.path().join("nope.yaml"), &roles(&["python"]));
        assert!(matches!(result, Err(ResumeError::Io(_))));
    }

    #[test]
    fn test_malformed_yaml_is_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.yaml");
        fs::write(&path, "name: [unclosed").unwrap();
        let result = YamlSource::open(&path, &roles(&["python"]));
        assert!(matches!(result, Err(ResumeError::Yaml(_))));
    }
}
