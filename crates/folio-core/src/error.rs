#![forbid(unsafe_code)]

//! Error type shared by the core and the web shell.
//!
//! Page behaviors never fail: absent elements are skipped. Errors only come
//! from host operations that can legitimately be refused (storage, style
//! injection, listener registration) and from configuration parsing.

/// Errors from configuration or host operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolioError {
    /// Configuration JSON was malformed.
    Config(String),
    /// A numeric setting was outside its legal range.
    InvalidSetting { name: &'static str, value: String },
    /// Preference storage refused a read or write.
    Storage(String),
    /// A required element (head, document) was not present.
    MissingElement(&'static str),
    /// A browser API call failed.
    Host(String),
    /// The document has not finished parsing.
    DocumentLoading,
}

impl core::fmt::Display for FolioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config parse error: {msg}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid setting '{name}': {value}")
            }
            Self::Storage(msg) => write!(f, "storage error: {msg}"),
            Self::MissingElement(what) => write!(f, "missing element: {what}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
            Self::DocumentLoading => {
                write!(f, "document still loading; mount after DOMContentLoaded")
            }
        }
    }
}

impl std::error::Error for FolioError {}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias for fallible core operations.
pub type Result<T> = core::result::Result<T, FolioError>;
