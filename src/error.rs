use thiserror::Error;

/// Main error type for the dashboard
#[derive(Error, Debug)]
pub enum DashError {
    #[error("required column not found: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("unsupported input format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("unknown test-stage column: {name}")]
    UnknownStageColumn { name: String },

    #[error("spreadsheet read failed: {message}")]
    Spreadsheet {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("dataframe operation failed")]
    DataFrame(#[from] polars::error::PolarsError),

    #[error("file I/O error: {path}")]
    FileIO {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("general error: {0}")]
    General(#[from] anyhow::Error),
}

impl DashError {
    pub fn missing_columns(columns: Vec<String>) -> Self {
        Self::MissingColumns { columns }
    }

    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn spreadsheet(message: impl Into<String>) -> Self {
        Self::Spreadsheet {
            message: message.into(),
            source: None,
        }
    }

    pub fn spreadsheet_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Spreadsheet {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIO {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DashError::MissingColumns { columns } => format!(
                "📋 Required column not found: {}. Check the export's header row.",
                columns.join(", ")
            ),
            DashError::UnsupportedFormat { extension } => format!(
                "📄 Unsupported format: {}. bomdash reads .csv and .xlsx files.",
                extension
            ),
            DashError::UnknownStageColumn { name } => {
                format!("🔎 No test-stage column named '{}' in this file.", name)
            }
            DashError::Spreadsheet { .. } => {
                "📄 Couldn't read this spreadsheet. It might be corrupted or password-protected."
                    .to_string()
            }
            DashError::FileIO { .. } => {
                "📁 File access error. Check the path and permissions.".to_string()
            }
            DashError::Configuration { message } => format!("⚙️ Configuration error: {}", message),
            _ => "Something went wrong. Check the logs for details.".to_string(),
        }
    }
}

/// Result type alias for convenience
pub type DashResult<T> = Result<T, DashError>;
