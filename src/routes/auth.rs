use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, Responder, post, web};

use crate::config::{AuthConfig, ServerConfig};
use crate::domain::auth::AdminClaims;
use crate::forms::auth::LoginForm;
use crate::repository::DieselRepository;
use crate::routes::{error_response, json_error};
use crate::services::{ServiceError, auth};

/// Administrator authenticated through an `Authorization: Bearer` header.
///
/// A missing header or an expired token answers `401`; any other invalid
/// token answers `403`.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin(pub AdminClaims);

impl FromRequest for AuthenticatedAdmin {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedAdmin, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<AuthConfig>>() else {
        log::error!("AuthConfig is not registered as app data");
        return Err(reject(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error interno del servidor.",
        ));
    };

    let Some(token) = bearer_token(req) else {
        return Err(reject(
            StatusCode::UNAUTHORIZED,
            "Acceso denegado. No se proporcionó token.",
        ));
    };

    match auth::verify_token(token, config) {
        Ok(claims) => Ok(AuthenticatedAdmin(claims)),
        Err(ServiceError::Unauthorized) => Err(reject(
            StatusCode::UNAUTHORIZED,
            "Token expirado. Por favor, inicia sesión de nuevo.",
        )),
        Err(_) => Err(reject(
            StatusCode::FORBIDDEN,
            "Token inválido. Acceso denegado.",
        )),
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn reject(status: StatusCode, message: &'static str) -> actix_web::Error {
    InternalError::from_response(message, json_error(status, message)).into()
}

#[post("/auth/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    auth_config: web::Data<AuthConfig>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    match auth::login(repo.get_ref(), &auth_config, form) {
        Ok(token) => HttpResponse::Ok().json(token),
        Err(err) => error_response("log in", err, &server_config),
    }
}
