use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate operator name `{name}` in catalog")]
    DuplicateOperator { name: String },
    #[error("operator entry #{index} has an empty name")]
    EmptyOperatorName { index: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("max_depth must be >= 1")]
    InvalidMaxDepth,
    #[error("override rule for `{name}` has no field positions")]
    EmptyOverride { name: String },
}
