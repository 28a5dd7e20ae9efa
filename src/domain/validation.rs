use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooMany {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidPhoneNumber {
        input: String,
    },
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        actual: u32,
    },
    InvalidUrl {
        field: &'static str,
        input: String,
    },
    InvalidId {
        field: &'static str,
        input: String,
    },
    InvalidHeader {
        name: String,
    },
    InvalidPath {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooMany { field, max, actual } => {
                write!(f, "too many {field}: {actual} (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                write!(f, "{field} out of range: {actual} (expected {min}..={max})")
            }
            Self::InvalidUrl { field, input } => {
                write!(f, "{field} must be an absolute https URL, got: {input}")
            }
            Self::InvalidId { field, input } => {
                write!(f, "{field} contains reserved characters: {input:?}")
            }
            Self::InvalidHeader { name } => write!(f, "invalid header: {name:?}"),
            Self::InvalidPath { input } => write!(
                f,
                "invalid request path {input:?}: expected a relative path without query or fragment"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
