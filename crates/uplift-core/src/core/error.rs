use thiserror::Error;

pub type UpliftResult<T> = Result<T, UpliftError>;

#[derive(Error, Debug)]
pub enum UpliftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The releases API or an archive download returned nothing usable.
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),

    /// The downloaded archive could not be opened or holds no entries.
    #[error("Archive extraction failed: {0}")]
    Extraction(String),

    /// Moving extracted files into the install root stopped partway.
    /// The install root may now hold a mix of old and new files.
    #[error("Overwriting failed: {0}")]
    Overwrite(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl UpliftError {
    /// Short machine-friendly name of the error kind, used in logs and install state.
    pub fn kind(&self) -> &'static str {
        match self {
            UpliftError::Io(_) => "io",
            UpliftError::Yaml(_) => "yaml",
            UpliftError::Path(_) => "path",
            UpliftError::Config(_) => "config",
            UpliftError::RemoteFetch(_) => "remote-fetch",
            UpliftError::Extraction(_) => "extraction",
            UpliftError::Overwrite(_) => "overwrite",
            UpliftError::NotFound(_) => "not-found",
        }
    }
}
