use actix_web::{HttpResponse, Responder, get, web};

use crate::config::ServerConfig;
use crate::services::main as main_service;

#[get("")]
pub async fn api_banner() -> impl Responder {
    HttpResponse::Ok().json(main_service::api_banner())
}

#[get("/health")]
pub async fn health(server_config: web::Data<ServerConfig>) -> impl Responder {
    HttpResponse::Ok().json(main_service::health(&server_config.app_env))
}
