pub mod admin_user;
pub mod product;
pub mod product_image;
