use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use tera::Tera;

use pushkind_storefront::config::AppConfig;
use pushkind_storefront::mailer::{LogMailer, Mailer, SmtpMailer};
use pushkind_storefront::repository::DieselRepository;
use pushkind_storefront::routes::configure_api;
use pushkind_storefront::storage::local::LocalImageStorage;
use pushkind_storefront::storage::{ImageStorage, PUBLIC_OBJECT_PREFIX};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.server.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let storage = match LocalImageStorage::new(
        &config.storage.root,
        config.storage.bucket.clone(),
        config.storage.public_base_url.clone(),
    ) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to open image storage: {e}");
            std::process::exit(1);
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.mail.smtp {
        Some(smtp) => match SmtpMailer::new(smtp) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                log::error!("Failed to configure SMTP transport: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("EMAIL_HOST is not set, contact emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let AppConfig {
        server,
        auth,
        storage: _,
        mail,
        checkout,
    } = config;
    let bind = (server.address.clone(), server.port);
    let bucket_route = format!("{PUBLIC_OBJECT_PREFIX}/{}", storage.bucket());

    log::info!(
        "Starting server on {}:{} ({})",
        server.address,
        server.port,
        server.app_env
    );

    HttpServer::new(move || {
        let cors = if server.allowed_origins.is_empty() {
            Cors::permissive()
        } else {
            server
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

        let mut app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_api)
            .service(Files::new(&bucket_route, storage.bucket_dir()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(server.clone()))
            .app_data(web::Data::new(auth.clone()))
            .app_data(web::Data::new(mail.clone()))
            .app_data(web::Data::new(checkout.clone()));

        if let Some(static_dir) = &server.static_dir {
            app = app.service(Files::new("/", static_dir).index_file("index.html"));
        }

        app
    })
    .bind(bind)?
    .run()
    .await
}
