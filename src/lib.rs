pub mod config;
pub mod domain;
pub mod forms;
pub mod mailer;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod storage;
