use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::config::ServerConfig;
use crate::forms::products::{ProductMultipartForm, read_image_uploads};
use crate::repository::DieselRepository;
use crate::routes::auth::AuthenticatedAdmin;
use crate::routes::error_response;
use crate::services::{ServiceError, products};
use crate::storage::local::LocalImageStorage;

#[get("/products")]
pub async fn list_products(
    params: web::Query<products::CatalogParams>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match products::list_products(repo.get_ref(), params.into_inner()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response("list products", err, &server_config),
    }
}

#[get("/products/categories")]
pub async fn list_categories(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match products::list_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response("list categories", err, &server_config),
    }
}

#[get("/products/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    match products::get_product(repo.get_ref(), product_id) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => product_not_found(),
        Err(err) => error_response("load product", err, &server_config),
    }
}

#[post("/products")]
pub async fn create_product(
    admin: AuthenticatedAdmin,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalImageStorage>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<ProductMultipartForm>,
) -> impl Responder {
    let (fields, files) = form.into_parts();
    let uploads = match read_image_uploads(files) {
        Ok(uploads) => uploads,
        Err(err) => return error_response("read images", err.into(), &server_config),
    };

    match products::create_product(repo.get_ref(), storage.get_ref(), fields, uploads) {
        Ok(product) => {
            log::info!("Admin {} created product {}", admin.0.email, product.id);
            HttpResponse::Created().json(product)
        }
        Err(err) => error_response("create product", err, &server_config),
    }
}

#[put("/products/{product_id}")]
pub async fn update_product(
    admin: AuthenticatedAdmin,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalImageStorage>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<ProductMultipartForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let (fields, files) = form.into_parts();
    let uploads = match read_image_uploads(files) {
        Ok(uploads) => uploads,
        Err(err) => return error_response("read images", err.into(), &server_config),
    };

    match products::update_product(
        repo.get_ref(),
        storage.get_ref(),
        product_id,
        fields,
        uploads,
    ) {
        Ok(product) => {
            log::info!("Admin {} updated product {}", admin.0.email, product.id);
            HttpResponse::Ok().json(product)
        }
        Err(ServiceError::NotFound) => product_not_found(),
        Err(err) => error_response("update product", err, &server_config),
    }
}

#[delete("/products/{product_id}")]
pub async fn delete_product(
    admin: AuthenticatedAdmin,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalImageStorage>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    match products::delete_product(repo.get_ref(), storage.get_ref(), product_id) {
        Ok(()) => {
            log::info!("Admin {} deleted product {product_id}", admin.0.email);
            HttpResponse::NoContent().finish()
        }
        Err(ServiceError::NotFound) => product_not_found(),
        Err(err) => error_response("delete product", err, &server_config),
    }
}

fn product_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Producto no encontrado." }))
}
