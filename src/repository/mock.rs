use mockall::mock;

use super::{AdminUserReader, AdminUserWriter, ProductReader, ProductWriter};
use crate::domain::{
    admin_user::{AdminUser, NewAdminUser},
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn list_categories(&self) -> RepositoryResult<Vec<String>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
        fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
    }
}

mock! {
    pub AdminUserReader {}

    impl AdminUserReader for AdminUserReader {
        fn get_admin_by_email(&self, email: &str) -> RepositoryResult<Option<AdminUser>>;
    }
}

mock! {
    pub AdminUserWriter {}

    impl AdminUserWriter for AdminUserWriter {
        fn create_admin(&self, new_admin: &NewAdminUser) -> RepositoryResult<AdminUser>;
    }
}
