use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternEvoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unknown evolution strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown mutation operator: {0}")]
    UnknownOperator(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, PatternEvoError>;
