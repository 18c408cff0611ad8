use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeError {
    #[error("Role not found: {0}")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(#[from] stencil::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ResumeError>;
