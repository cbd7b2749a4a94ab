use tera::{Context, Tera};

use crate::config::MailConfig;
use crate::forms::contact::ContactForm;
use crate::mailer::{Mailer, OutgoingEmail};
use crate::services::{ServiceError, ServiceResult};

/// Template rendering the body of contact emails.
pub const CONTACT_TEMPLATE: &str = "emails/contact.html";

/// Validate a contact submission and forward it to the shop owner.
///
/// The email is sent from the shop address under the visitor's name, with the
/// visitor's address as `Reply-To`.
pub fn send_contact_message<M>(
    mailer: &M,
    tera: &Tera,
    config: &MailConfig,
    form: ContactForm,
) -> ServiceResult<()>
where
    M: Mailer + ?Sized,
{
    let contact = form.into_contact_message()?;

    let mut context = Context::new();
    context.insert("contact", &contact);
    let html_body = tera.render(CONTACT_TEMPLATE, &context).map_err(|err| {
        log::error!("Failed to render {CONTACT_TEMPLATE}: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    let email = OutgoingEmail {
        from_name: contact.name,
        from_address: config.from_address.clone(),
        reply_to: contact.email,
        to: config.recipient.clone(),
        subject: format!("Mensaje de Contacto: {}", contact.subject),
        html_body,
    };

    mailer.send(&email).map_err(|err| {
        log::error!("Failed to send contact email: {err}");
        ServiceError::MailFailed(err.to_string())
    })?;

    log::info!("Contact email from {} delivered", email.reply_to);
    Ok(())
}
