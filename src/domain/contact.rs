use serde::Serialize;

/// Message submitted through the public contact form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
