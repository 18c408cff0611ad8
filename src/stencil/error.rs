use thiserror::Error;

/// Everything that can go wrong while parsing or rendering a template.
///
/// Render-time variants carry the 1-based line of the tag that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("undefined variable `{name}` on line {line}")]
    Undefined { name: String, line: usize },

    #[error("cannot iterate over {kind} `{name}` on line {line}")]
    NotIterable {
        name: String,
        kind: &'static str,
        line: usize,
    },

    #[error("`{name}` is a {kind}, not a mapping, on line {line}")]
    NotAMapping {
        name: String,
        kind: &'static str,
        line: usize,
    },

    #[error("cannot print a {kind} on line {line}; use a filter such as join")]
    NotPrintable { kind: &'static str, line: usize },

    #[error("unknown filter `{name}` on line {line}")]
    UnknownFilter { name: String, line: usize },

    #[error("filter `{name}` failed on line {line}: {message}")]
    Filter {
        name: String,
        line: usize,
        message: String,
    },

    #[error("template `{0}` not found")]
    TemplateNotFound(String),

    #[error("data cannot be used as template input: {0}")]
    Data(String),
}

impl Error {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Error::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Line the error refers to, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Syntax { line, .. }
            | Error::Undefined { line, .. }
            | Error::NotIterable { line, .. }
            | Error::NotAMapping { line, .. }
            | Error::NotPrintable { line, .. }
            | Error::UnknownFilter { line, .. }
            | Error::Filter { line, .. } => Some(*line),
            Error::TemplateNotFound(_) | Error::Data(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
