//! Error taxonomy for the session and catalog controllers.

use std::fmt;

use thiserror::Error;

/// Failure talking to the remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in rejected: {0}")]
    InvalidCredentials(String),
    #[error("sign-in failed: {0}")]
    Remote(#[source] RemoteError),
    #[error("signin response carried an unusable expiry: {0}")]
    InvalidExpiry(i64),
}

impl From<RemoteError> for AuthError {
    fn from(value: RemoteError) -> Self {
        match value {
            RemoteError::Rejected { status, message } if status < 500 => {
                Self::InvalidCredentials(message)
            }
            other => Self::Remote(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to list products: {0}")]
    Remote(#[from] RemoteError),
}

/// Local form check failure. Raised before any request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("main image URL is required")]
    MissingImageUrl,
    #[error("title is required")]
    MissingTitle,
    #[error("category is required")]
    MissingCategory,
    #[error("unit is required")]
    MissingUnit,
    #[error("original price is required")]
    MissingOriginPrice,
    #[error("original price must be a number greater than 0")]
    InvalidOriginPrice,
    #[error("price is required")]
    MissingPrice,
    #[error("price must be a number greater than 0")]
    InvalidPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for ProductAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no authenticated admin session")]
    NotAuthenticated,
    #[error("{action} product failed: {source}")]
    Rejected {
        action: ProductAction,
        #[source]
        source: RemoteError,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no product form is open")]
    FormClosed,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
