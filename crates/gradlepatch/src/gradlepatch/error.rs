use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = SetupError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{} not found!", .0.display())]
    MissingFile(PathBuf),

    #[error("{field} not found in {}", .path.display())]
    MissingField { field: &'static str, path: PathBuf },

    #[error("failed to download {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} was interrupted: {source}")]
    Interrupted {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("distribution URL {0} does not name an archive")]
    UnnamedArchive(String),

    #[error("downloaded file {} is empty or missing", .0.display())]
    EmptyArchive(PathBuf),

    #[error("{} is not a valid zip file: {source}", .path.display())]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("insertion anchor `{anchor}` not found in {}", .path.display())]
    MissingAnchor { anchor: String, path: PathBuf },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl SetupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Attaches the offending path to a raw `std::io::Error`.
pub trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| SetupError::io(path, source))
    }
}
