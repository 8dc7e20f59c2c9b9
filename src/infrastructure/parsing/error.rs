//! Parsing error types for the lost-property boards

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector for {field}: {selector} - {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("No category options found on the search form (tried '{selector}')")]
    NoCategoriesFound { selector: String },
}

impl ParsingError {
    pub fn invalid_selector(field: &'static str, selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            field,
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Selector problems never go away on retry; a missing catalogue might
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidSelector { .. } => false,
            Self::NoCategoriesFound { .. } => true,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
