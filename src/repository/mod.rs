use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::admin_user::{AdminUser, NewAdminUser};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};

pub mod admin_user;
pub mod product;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        let mut conn = self.pool.get()?;
        product::register_sql_functions(&mut conn)?;
        Ok(conn)
    }
}

/// Read-only operations over catalog products.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    /// Return the total number of matches and the requested page of products.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Distinct non-null categories of active products, sorted ascending.
    fn list_categories(&self) -> RepositoryResult<Vec<String>>;
}

/// Write operations over catalog products.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Lookup of administrator accounts.
pub trait AdminUserReader {
    fn get_admin_by_email(&self, email: &str) -> RepositoryResult<Option<AdminUser>>;
}

pub trait AdminUserWriter {
    fn create_admin(&self, new_admin: &NewAdminUser) -> RepositoryResult<AdminUser>;
}
