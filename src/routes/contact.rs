use std::sync::Arc;

use actix_web::{HttpResponse, Responder, post, web};
use serde_json::json;
use tera::Tera;

use crate::config::{MailConfig, ServerConfig};
use crate::forms::contact::ContactForm;
use crate::mailer::Mailer;
use crate::routes::error_response;
use crate::services::{ServiceError, contact};

#[post("/contact")]
pub async fn send_contact(
    mailer: web::Data<Arc<dyn Mailer>>,
    tera: web::Data<Tera>,
    mail_config: web::Data<MailConfig>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ContactForm>,
) -> impl Responder {
    // SMTP delivery blocks, keep it off the worker thread.
    let result = web::block(move || {
        contact::send_contact_message(mailer.get_ref().as_ref(), &tera, &mail_config, form)
    })
    .await
    .unwrap_or_else(|err| Err(ServiceError::Internal(err.to_string())));

    match result {
        Ok(()) => HttpResponse::Ok().json(json!({ "message": "Mensaje enviado exitosamente." })),
        Err(err) => error_response("send contact message", err, &server_config),
    }
}
