use actix_multipart::form::MultipartFormConfig;
use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::config::ServerConfig;
use crate::forms::products::{MAX_IMAGE_BYTES, MAX_IMAGES_PER_REQUEST};
use crate::services::ServiceError;

pub mod auth;
pub mod checkout;
pub mod contact;
pub mod main;
pub mod products;

/// Largest JSON body accepted by the API.
const JSON_LIMIT_BYTES: usize = 1024 * 1024;

/// JSON body `{ "error": message }`.
pub fn json_error(status: actix_web::http::StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message }))
}

/// Map a service failure onto the API's JSON error responses.
///
/// Server-side failures are logged with `action`; their detail is only
/// included in the body in development.
pub fn error_response(action: &str, err: ServiceError, server: &ServerConfig) -> HttpResponse {
    let public_message = match &err {
        ServiceError::Validation(message) => {
            return HttpResponse::BadRequest().json(json!({ "error": message }));
        }
        ServiceError::NotFound => {
            return HttpResponse::NotFound().json(json!({ "error": "Recurso no encontrado." }));
        }
        ServiceError::Unauthorized => {
            return HttpResponse::Unauthorized().json(json!({ "error": "Credenciales inválidas." }));
        }
        ServiceError::Forbidden => {
            return HttpResponse::Forbidden().json(json!({ "error": "Acceso denegado." }));
        }
        ServiceError::UploadFailed(_) => "Error al subir una de las imágenes.",
        ServiceError::MailFailed(_) => {
            "Error al enviar el mensaje. Por favor, inténtalo de nuevo."
        }
        ServiceError::QueryFailed(_)
        | ServiceError::PersistenceFailed(_)
        | ServiceError::Internal(_) => "Error interno del servidor.",
    };

    log::error!("Failed to {action}: {err}");

    if server.is_development() {
        HttpResponse::InternalServerError().json(json!({
            "error": public_message,
            "details": err.to_string(),
        }))
    } else {
        HttpResponse::InternalServerError().json(json!({ "error": public_message }))
    }
}

/// JSON extractor settings returning `400` JSON errors for malformed bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest()
                .json(json!({ "error": format!("Cuerpo JSON inválido: {err}") }));
            InternalError::from_response(err, response).into()
        })
}

/// Multipart extractor settings sized for a full set of product images.
pub fn multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(MAX_IMAGES_PER_REQUEST * MAX_IMAGE_BYTES + JSON_LIMIT_BYTES)
        .memory_limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let response = HttpResponse::BadRequest()
                .json(json!({ "error": format!("Formulario inválido: {err}") }));
            InternalError::from_response(err, response).into()
        })
}

/// Register every `/api` endpoint.
///
/// `/products/categories` is registered before `/products/{id}` so the literal
/// segment wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(multipart_config())
            .service(main::api_banner)
            .service(main::health)
            .service(auth::login)
            .service(products::list_products)
            .service(products::list_categories)
            .service(products::show_product)
            .service(products::create_product)
            .service(products::update_product)
            .service(products::delete_product)
            .service(contact::send_contact)
            .service(checkout::checkout),
    );
}
