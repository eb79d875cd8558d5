use std::fmt;

/// Custom error types for track conversion
#[derive(Debug)]
pub enum ConvertError {
    /// I/O errors
    Io(std::io::Error),
    /// Invalid FIT file header
    InvalidHeader(String),
    /// Invalid or undecodable FIT record
    InvalidRecord(String),
    /// End of file reached unexpectedly
    UnexpectedEof,
    /// XML reading error
    Xml(String),
    /// Text that should be numeric or temporal failed to parse
    Parse(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io(err) => write!(f, "I/O error: {}", err),
            ConvertError::InvalidHeader(msg) => write!(f, "Invalid header: {}", msg),
            ConvertError::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
            ConvertError::UnexpectedEof => write!(f, "Unexpected end of file"),
            ConvertError::Xml(msg) => write!(f, "XML error: {}", msg),
            ConvertError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Io(err)
    }
}

impl From<quick_xml::Error> for ConvertError {
    fn from(err: quick_xml::Error) -> Self {
        ConvertError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ConvertError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ConvertError::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
