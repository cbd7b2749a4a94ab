use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::forms::auth::AuthFormError;
use crate::forms::checkout::CheckoutFormError;
use crate::forms::contact::ContactFormError;
use crate::forms::products::ProductFormError;

/// Error type returned by service functions.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected; the message names the offending fields.
    #[error("{0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    /// Missing, expired or wrong credentials.
    #[error("unauthorized")]
    Unauthorized,
    /// Credentials present but not acceptable.
    #[error("forbidden")]
    Forbidden,
    /// An image could not be stored; nothing was written.
    #[error("image upload failed: {0}")]
    UploadFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(RepositoryError),
    #[error("persistence failed: {0}")]
    PersistenceFailed(RepositoryError),
    #[error("mail delivery failed: {0}")]
    MailFailed(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Map a repository error raised while reading.
    pub fn query(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::ValidationError(message) => Self::Validation(message),
            other => Self::QueryFailed(other),
        }
    }

    /// Map a repository error raised while writing.
    pub fn persistence(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::ValidationError(message) => Self::Validation(message),
            other => Self::PersistenceFailed(other),
        }
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<AuthFormError> for ServiceError {
    fn from(val: AuthFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<ContactFormError> for ServiceError {
    fn from(val: ContactFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}

impl From<CheckoutFormError> for ServiceError {
    fn from(val: CheckoutFormError) -> Self {
        ServiceError::Validation(val.to_string())
    }
}
