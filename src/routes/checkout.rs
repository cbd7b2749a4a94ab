use actix_web::{HttpResponse, Responder, post, web};

use crate::config::{CheckoutConfig, ServerConfig};
use crate::forms::checkout::CheckoutForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::checkout as checkout_service;

#[post("/checkout")]
pub async fn checkout(
    repo: web::Data<DieselRepository>,
    checkout_config: web::Data<CheckoutConfig>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<CheckoutForm>,
) -> impl Responder {
    match checkout_service::build_order_message(repo.get_ref(), &checkout_config, form) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => error_response("build order message", err, &server_config),
    }
}
