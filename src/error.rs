use thiserror::Error;

/// errors that stop a run before it starts — a bad threshold, an
/// unreadable or undecodable config file. Never produced mid-conflation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failure reading configuration file {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failure decoding TOML configuration {0}: {1}")]
    Toml(String, toml::de::Error),
    #[error("failure decoding JSON configuration {0}: {1}")]
    Json(String, serde_json::Error),
    #[error("unsupported configuration file type: {0}")]
    UnsupportedFileType(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// a non-fatal problem with one feature, surfaced to the caller in
/// [`crate::ConflateOutput::warnings`] rather than aborting the run.
#[derive(Error, Debug, Clone)]
pub enum FeatureWarning {
    #[error("primary feature {primary_ref} has no geometry and was skipped")]
    MissingGeometry { primary_ref: usize },
    #[error("primary feature {primary_ref} has structurally invalid geometry ({kind}) and was skipped")]
    InvalidGeometry { primary_ref: usize, kind: String },
    #[error(
        "primary feature {primary_ref} lost a contested match on secondary feature {contended_secondary_ref} to a closer primary ({dist_m:.1}m) and was dropped"
    )]
    DisplacedByContention {
        primary_ref: usize,
        contended_secondary_ref: usize,
        dist_m: f64,
    },
}
