use thiserror::Error;

#[derive(Error, Debug)]
pub enum NbBatchError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Notebook directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Conversion tool could not be launched: {program}")]
    ToolNotFound { program: String, message: String },

    #[error("Failed to write report: {message}")]
    Report { message: String },
}

impl NbBatchError {
    /// Errors on the input directory itself. The batch treats these as
    /// "nothing to convert" instead of aborting.
    pub fn is_discovery_miss(&self) -> bool {
        matches!(
            self,
            NbBatchError::DirectoryNotFound { .. }
                | NbBatchError::NotADirectory { .. }
                | NbBatchError::Permission { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for NbBatchError {
    fn user_message(&self) -> String {
        match self {
            NbBatchError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            NbBatchError::DirectoryNotFound { path } => {
                format!("Notebook directory does not exist: {}", path)
            }
            NbBatchError::NotADirectory { path } => {
                format!("Expected a directory of notebooks: {}", path)
            }
            NbBatchError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            NbBatchError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            NbBatchError::ToolNotFound { program, message } => {
                format!("Could not run '{}': {}", program, message)
            }
            NbBatchError::Report { message } => {
                format!("Could not write the conversion report: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            NbBatchError::Config { .. } => Some(
                "Check your configuration file syntax, or run with --generate-config to start from the defaults.".to_string()
            ),
            NbBatchError::DirectoryNotFound { .. } | NbBatchError::NotADirectory { .. } => Some(
                "Run from the directory that contains your notebooks folder, or pass the folder explicitly (e.g., nbbatch chapters).".to_string()
            ),
            NbBatchError::Permission { .. } => Some(
                "Ensure you have read permission on the notebook directory and write permission on the output directory.".to_string()
            ),
            NbBatchError::ToolNotFound { .. } => Some(
                "Install Jupyter (pip install jupyter nbconvert) or point --tool at the converter executable.".to_string()
            ),
            NbBatchError::Report { .. } => Some(
                "Check that the directory for --report exists and is writable.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for NbBatchError {
    fn from(error: toml::de::Error) -> Self {
        NbBatchError::Config {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for NbBatchError {
    fn from(error: serde_json::Error) -> Self {
        NbBatchError::Report {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NbBatchError>;
