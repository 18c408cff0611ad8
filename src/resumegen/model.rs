use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One role-specific view of the resume, as handed to the template.
///
/// Built fresh per role by a [`crate::source::RecordSource`] and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeRecord {
    pub role: String,
    pub name: String,
    pub title: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    // Optional contact fields render as empty text when absent
    pub location: String,
    pub phone: String,
    pub website: String,
    pub summary: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    pub location: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectEntry {
    pub name: String,
    pub tech_stack: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub dates: String,
}

/// Skill categories and their items, kept in the order they were added.
///
/// Serializes as a mapping so templates can iterate it with `skills.items()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet {
    groups: Vec<(String, Vec<String>)>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category at the end, or replaces the items of an existing one in place.
    pub fn insert(&mut self, category: impl Into<String>, items: Vec<String>) {
        let category = category.into();
        match self.groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = items,
            None => self.groups.push((category, items)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<C: Into<String>> FromIterator<(C, Vec<String>)> for SkillSet {
    fn from_iter<I: IntoIterator<Item = (C, Vec<String>)>>(iter: I) -> Self {
        let mut set = SkillSet::new();
        for (category, items) in iter {
            set.insert(category, items);
        }
        set
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (category, items) in &self.groups {
            map.serialize_entry(category, items)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skillset_keeps_insertion_order() {
        let skills: SkillSet = vec![
            ("languages", items(&["Python", "Go"])),
            ("cloud", items(&["AWS"])),
            ("databases", items(&["Postgres"])),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = skills.categories().collect();
        assert_eq!(order, vec!["languages", "cloud", "databases"]);
    }

    #[test]
    fn test_skillset_insert_replaces_in_place() {
        let mut skills = SkillSet::new();
        skills.insert("a", items(&["1"]));
        skills.insert("b", items(&["2"]));
        skills.insert("a", items(&["3"]));

        assert_eq!(skills.len(), 2);
        assert_eq!(skills.categories().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(skills.get("a"), Some(&["3".to_string()][..]));
    }

    #[test]
    fn test_skillset_serializes_as_ordered_mapping() {
        let mut skills = SkillSet::new();
        skills.insert("zeta", items(&["z"]));
        skills.insert("alpha", items(&["a"]));

        let json = serde_json::to_string(&skills).unwrap();
        assert_eq!(json, r#"{"zeta":["z"],"alpha":["a"]}"#);
    }

    #[test]
    fn test_record_exposes_template_fields() {
        let record = ResumeRecord {
            name: "Ada".into(),
            ..Default::default()
        };
        let value = stencil::Value::from_serialize(&record).unwrap();
        for field in ["name", "title", "summary", "experience", "skills", "role"] {
            assert!(value.get(field).is_some(), "missing field {}", field);
        }
    }
}
