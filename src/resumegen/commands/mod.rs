use crate::error::ResumeError;
use std::path::PathBuf;

pub mod build;
pub mod check;
pub mod init;
pub mod render;
pub mod roles;

/// Name the resume template is registered under in the renderer.
pub const TEMPLATE_NAME: &str = "resume";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Per-role results of a batch. One role failing never stops the others.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<(String, PathBuf)>,
    pub failed: Vec<(String, ResumeError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_roles(&self) -> Vec<&str> {
        self.failed.iter().map(|(role, _)| role.as_str()).collect()
    }

    pub fn succeeded_roles(&self) -> Vec<&str> {
        self.succeeded.iter().map(|(role, _)| role.as_str()).collect()
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub report: BatchReport,
    pub rendered: Option<String>,
    pub roles: Vec<String>,
    pub created_files: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    /// False when any role in the batch failed.
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }

    pub fn with_rendered(mut self, rendered: String) -> Self {
        self.rendered = Some(rendered);
        self
    }

    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }
}
