pub mod admin_user;
pub mod auth;
pub mod cart;
pub mod contact;
pub mod image;
pub mod product;
