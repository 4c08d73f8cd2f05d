use std::fmt;

#[derive(Debug, Clone)]
pub enum SmartlinkError {
    Validation(String),
    NotFound(String),
    FileOperation(String),
    Serialization(String),
    StorageBackendNotFound(String),
    DateParse(String),
}

impl SmartlinkError {
    /// Stable error code, used in API payloads and log lines
    pub fn code(&self) -> &'static str {
        match self {
            SmartlinkError::Validation(_) => "E001",
            SmartlinkError::NotFound(_) => "E002",
            SmartlinkError::FileOperation(_) => "E003",
            SmartlinkError::Serialization(_) => "E004",
            SmartlinkError::StorageBackendNotFound(_) => "E005",
            SmartlinkError::DateParse(_) => "E006",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            SmartlinkError::Validation(_) => "Validation Error",
            SmartlinkError::NotFound(_) => "Resource Not Found",
            SmartlinkError::FileOperation(_) => "File Operation Error",
            SmartlinkError::Serialization(_) => "Serialization Error",
            SmartlinkError::StorageBackendNotFound(_) => "Storage Backend Not Found",
            SmartlinkError::DateParse(_) => "Date Parse Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SmartlinkError::Validation(msg) => msg,
            SmartlinkError::NotFound(msg) => msg,
            SmartlinkError::FileOperation(msg) => msg,
            SmartlinkError::Serialization(msg) => msg,
            SmartlinkError::StorageBackendNotFound(msg) => msg,
            SmartlinkError::DateParse(msg) => msg,
        }
    }

    /// Colored one-liner for server startup failures
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SmartlinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SmartlinkError {}

impl SmartlinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SmartlinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SmartlinkError::NotFound(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SmartlinkError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SmartlinkError::Serialization(msg.into())
    }

    pub fn storage_backend_not_found<T: Into<String>>(msg: T) -> Self {
        SmartlinkError::StorageBackendNotFound(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        SmartlinkError::DateParse(msg.into())
    }
}

impl From<std::io::Error> for SmartlinkError {
    fn from(err: std::io::Error) -> Self {
        SmartlinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SmartlinkError {
    fn from(err: serde_json::Error) -> Self {
        SmartlinkError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SmartlinkError {
    fn from(err: chrono::ParseError) -> Self {
        SmartlinkError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SmartlinkError>;
