//! The tagged resume document and the per-role selection rules.
//!
//! ```yaml
//! name: Ada Lovelace
//! title: Software Engineer
//! email: ada@example.com
//! linkedin: linkedin.com/in/ada
//! github: github.com/ada
//! location: London            # optional, as are phone and website
//! summary:
//!   - text: Built analytical engines in Python
//!     tags: [python, backend]
//!   - Plain strings are shown for every role
//! experience:
//!   - company: Engines Ltd
//!     role: Engineer
//!     dates: 2019 - 2024
//!     bullets:
//!       - text: Cut build times by **40%**
//!         tags: [all]
//! skills:
//!   python: [Django, FastAPI]         # shown for `python`, `fullstack` and `all`
//!   cloud:
//!     label: Cloud & DevOps           # rendered category name
//!     items: [AWS, Terraform]
//!     tags: [cloud, devops, backend]
//! ```
//!
//! Selection for a role:
//! - The `all` role keeps everything.
//! - Untagged items are kept for every role.
//! - Tagged items are kept when their tags contain the role or `all`.
//! - Experience and project entries with no surviving bullets are dropped.
//! - A plain skill list is kept when its category is the role, or the role is
//!   `all` or `fullstack`. A detailed skill group follows the tag rule.

use super::{normalize_role, ALL_ROLES};
use crate::model::{EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord, SkillSet};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// Role that receives every plain skill list.
pub const FULLSTACK_ROLE: &str = "fullstack";

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    pub title: String,
    pub email: String,
    pub linkedin: String,
    pub github: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub summary: Vec<TaggedText>,
    #[serde(default)]
    pub experience: Vec<ExperienceDoc>,
    #[serde(default)]
    pub projects: Vec<ProjectDoc>,
    #[serde(default)]
    pub education: Vec<EducationDoc>,
    #[serde(default, deserialize_with = "ordered_skill_groups")]
    pub skills: Vec<(String, SkillGroupDoc)>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaggedText {
    Plain(String),
    Tagged {
        text: String,
        tags: Option<Vec<String>>,
    },
}

impl TaggedText {
    fn text(&self) -> &str {
        match self {
            TaggedText::Plain(text) | TaggedText::Tagged { text, .. } => text,
        }
    }

    fn tags(&self) -> Option<&[String]> {
        match self {
            TaggedText::Plain(_) => None,
            TaggedText::Tagged { tags, .. } => tags.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceDoc {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    pub dates: String,
    #[serde(default)]
    pub bullets: Vec<TaggedText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDoc {
    pub name: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub bullets: Vec<TaggedText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EducationDoc {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub dates: String,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillGroupDoc {
    Items(Vec<String>),
    Detailed {
        label: Option<String>,
        items: Vec<String>,
        tags: Option<Vec<String>>,
    },
}

/// Reads the skills mapping without losing the author's category order.
fn ordered_skill_groups<'de, D>(deserializer: D) -> Result<Vec<(String, SkillGroupDoc)>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
    mapping
        .into_iter()
        .map(|(key, value)| {
            let category = key
                .as_str()
                .ok_or_else(|| D::Error::custom("skill category names must be strings"))?
                .to_string();
            let group = serde_yaml::from_value(value).map_err(|e| {
                D::Error::custom(format!("skill category `{}`: {}", category, e))
            })?;
            Ok((category, group))
        })
        .collect()
}

fn selected(tags: Option<&[String]>, role: &str) -> bool {
    if role == ALL_ROLES {
        return true;
    }
    match tags {
        None => true,
        Some(tags) => tags.iter().map(|t| normalize_role(t)).any(|t| t == ALL_ROLES || t == role),
    }
}

fn select_texts(items: &[TaggedText], role: &str) -> Vec<String> {
    items
        .iter()
        .filter(|item| selected(item.tags(), role))
        .map(|item| item.text().to_string())
        .collect()
}

impl ResumeDocument {
    pub fn from_yaml(source: &str) -> serde_yaml::Result<Self> {
        serde_yaml::from_str(source)
    }

    /// Builds the record for `role`, which must already be normalized.
    pub fn select(&self, role: &str) -> ResumeRecord {
        let experience = self
            .experience
            .iter()
            .filter_map(|exp| {
                let bullets = select_texts(&exp.bullets, role);
                (!bullets.is_empty()).then(|| ExperienceEntry {
                    role: exp.role.clone(),
                    company: exp.company.clone(),
                    location: exp.location.clone(),
                    dates: exp.dates.clone(),
                    bullets,
                })
            })
            .collect();

        let projects = self
            .projects
            .iter()
            .filter_map(|proj| {
                let bullets = select_texts(&proj.bullets, role);
                (!bullets.is_empty()).then(|| ProjectEntry {
                    name: proj.name.clone(),
                    tech_stack: proj.tech_stack.clone(),
                    dates: proj.dates.clone(),
                    bullets,
                })
            })
            .collect();

        let education = self
            .education
            .iter()
            .filter(|edu| selected(edu.tags.as_deref(), role))
            .map(|edu| EducationEntry {
                degree: edu.degree.clone(),
                institution: edu.institution.clone(),
                location: edu.location.clone(),
                dates: edu.dates.clone(),
            })
            .collect();

        let skills = self
            .skills
            .iter()
            .filter_map(|(category, group)| match group {
                SkillGroupDoc::Items(items) => {
                    let keep = role == ALL_ROLES
                        || role == FULLSTACK_ROLE
                        || normalize_role(category) == role;
                    keep.then(|| (category.clone(), items.clone()))
                }
                SkillGroupDoc::Detailed { label, items, tags } => selected(tags.as_deref(), role)
                    .then(|| (label.clone().unwrap_or_else(|| category.clone()), items.clone())),
            })
            .collect::<SkillSet>();

        ResumeRecord {
            role: role.to_string(),
            name: self.name.clone(),
            title: self.title.clone(),
            email: self.email.clone(),
            linkedin: self.linkedin.clone(),
            github: self.github.clone(),
            location: self.location.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            summary: select_texts(&self.summary, role),
            experience,
            projects,
            education,
            skills,
        }
    }

    /// Every role named in a tag or plain skill category, normalized.
    pub fn roles_mentioned(&self) -> BTreeSet<String> {
        let mut roles = BTreeSet::new();
        let mut add = |tags: Option<&[String]>| {
            for tag in tags.unwrap_or_default() {
                roles.insert(normalize_role(tag));
            }
        };

        for item in &self.summary {
            add(item.tags());
        }
        for exp in &self.experience {
            exp.bullets.iter().for_each(|b| add(b.tags()));
        }
        for proj in &self.projects {
            proj.bullets.iter().for_each(|b| add(b.tags()));
        }
        for edu in &self.education {
            add(edu.tags.as_deref());
        }
        for (category, group) in &self.skills {
            match group {
                SkillGroupDoc::Items(_) => add(Some(std::slice::from_ref(category))),
                SkillGroupDoc::Detailed { tags, .. } => add(tags.as_deref()),
            }
        }
        roles
    }
}
