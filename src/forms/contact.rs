use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::contact::ContactMessage;
use crate::forms::{invalid_fields, sanitize_inline_text, sanitize_multiline_text};

const NAME_MAX_LEN_VALIDATOR: u64 = 128;
const SUBJECT_MAX_LEN_VALIDATOR: u64 = 200;
const MESSAGE_MAX_LEN_VALIDATOR: u64 = 5000;

#[derive(Debug, Error)]
pub enum ContactFormError {
    #[error("todos los campos son obligatorios")]
    MissingFields,
    #[error("campos inválidos: {}", invalid_fields(.0))]
    Validation(#[from] ValidationErrors),
}

/// Payload of the public contact form.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactForm {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = SUBJECT_MAX_LEN_VALIDATOR))]
    pub subject: String,
    #[validate(length(max = MESSAGE_MAX_LEN_VALIDATOR))]
    pub message: String,
}

impl ContactForm {
    pub fn into_contact_message(self) -> Result<ContactMessage, ContactFormError> {
        let form = Self {
            name: sanitize_inline_text(&self.name),
            email: self.email.trim().to_string(),
            subject: sanitize_inline_text(&self.subject),
            message: sanitize_multiline_text(&self.message),
        };

        if [&form.name, &form.email, &form.subject, &form.message]
            .iter()
            .any(|value| value.is_empty())
        {
            return Err(ContactFormError::MissingFields);
        }

        form.validate()?;

        Ok(ContactMessage {
            name: form.name,
            email: form.email,
            subject: form.subject,
            message: form.message,
        })
    }
}
