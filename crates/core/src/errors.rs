use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported action `{0}`")]
    UnsupportedAction(String),
}

/// Errors that stop the processing of a single snapshot. None of them are
/// fatal to a worker loop.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("completion failure: {0}")]
    Completion(String),
    #[error("order lookup failure: {0}")]
    Lookup(String),
    #[error("presentation failure: {0}")]
    Presentation(String),
    #[error("routing failure: {0}")]
    Routing(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain",
            Self::Completion(_) => "completion",
            Self::Lookup(_) => "lookup",
            Self::Presentation(_) => "presentation",
            Self::Routing(_) => "routing",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) => "The request could not be processed. Check inputs and try again.",
            Self::Completion(_) => {
                "The reasoning service is temporarily unavailable. Please retry shortly."
            }
            Self::Lookup(_) => "Order data is temporarily unavailable. Please retry shortly.",
            Self::Presentation(_) | Self::Routing(_) => "An unexpected internal error occurred.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn domain_error_is_transparent() {
        let error = ApplicationError::from(DomainError::UnsupportedAction("Teleport".to_owned()));

        assert_eq!(error.to_string(), "unsupported action `Teleport`");
        assert_eq!(error.error_class(), "domain");
    }

    #[test]
    fn completion_error_has_user_safe_message() {
        let error = ApplicationError::Completion("status 401: invalid api key".to_owned());

        assert_eq!(
            error.user_message(),
            "The reasoning service is temporarily unavailable. Please retry shortly."
        );
        assert!(error.to_string().contains("invalid api key"));
    }

    #[test]
    fn lookup_error_maps_to_lookup_class() {
        let error = ApplicationError::Lookup("directory offline".to_owned());

        assert_eq!(error.error_class(), "lookup");
        assert_eq!(error.user_message(), "Order data is temporarily unavailable. Please retry shortly.");
    }
}
