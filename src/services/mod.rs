pub mod auth;
pub mod checkout;
pub mod contact;
pub mod errors;
pub mod images;
pub mod main;
pub mod products;

pub use errors::{ServiceError, ServiceResult};
