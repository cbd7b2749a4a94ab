use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::invalid_fields;

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("campos inválidos: {}", invalid_fields(.0))]
    Validation(#[from] ValidationErrors),
}

/// Credentials posted to the admin login endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    /// Validate the payload and return the normalized email with the password.
    pub fn into_credentials(self) -> Result<(String, String), AuthFormError> {
        let form = Self {
            email: self.email.trim().to_lowercase(),
            password: self.password,
        };
        form.validate()?;
        Ok((form.email, form.password))
    }
}
