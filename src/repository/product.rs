use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product::{
        ActiveFilter, NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    models::product_image::{NewProductImage, ProductImage as DbProductImage},
    repository::{DieselRepository, ProductReader, ProductWriter},
    schema::products,
};

type BoxedProductQuery<'a> = products::BoxedQuery<'a, Sqlite>;

diesel::define_sql_function! {
    /// Unicode-aware `lower`; SQLite's builtin only folds ASCII.
    fn unicode_lower(value: Nullable<Text>) -> Nullable<Text>;
}

/// Register the Rust-side SQL functions used by product queries on `conn`.
pub(crate) fn register_sql_functions(conn: &mut SqliteConnection) -> QueryResult<()> {
    unicode_lower_utils::register_impl(conn, |value: Option<String>| {
        value.map(|value| value.to_lowercase())
    })
}

/// Build the filtered (unordered, unpaginated) product query for `query`.
fn filtered_products(query: &ProductListQuery) -> BoxedProductQuery<'_> {
    let mut items = products::table.into_boxed::<Sqlite>();

    match query.active {
        ActiveFilter::Active => items = items.filter(products::active.eq(true)),
        ActiveFilter::Inactive => items = items.filter(products::active.eq(false)),
        ActiveFilter::Any => {}
    }

    if let Some(category) = query.category.as_ref() {
        items = items.filter(products::category.eq(category));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        items = items.filter(
            unicode_lower(products::name.nullable())
                .like(pattern.clone())
                .escape('\\')
                .or(unicode_lower(products::description)
                    .like(pattern)
                    .escape('\\')),
        );
    }

    items
}

/// Escape LIKE wildcards so the term is matched as a literal substring.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        match product {
            Some(db_product) => {
                let mut images = load_images_for_products(&mut conn, &[db_product.id])?;
                let urls = images.remove(&db_product.id).unwrap_or_default();
                Ok(Some(db_product.into_domain(urls)))
            }
            None => Ok(None),
        }
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items =
            filtered_products(&query).order((products::created_at.desc(), products::id.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = pagination
                .page
                .max(1)
                .saturating_sub(1)
                .saturating_mul(pagination.per_page);
            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let limit = i64::try_from(pagination.per_page).unwrap_or(i64::MAX);
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok((total, Vec::new()));
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut image_map = load_images_for_products(&mut conn, &product_ids)?;

        let domain_products = db_products
            .into_iter()
            .map(|db_product| {
                let urls = image_map.remove(&db_product.id).unwrap_or_default();
                db_product.into_domain(urls)
            })
            .collect();

        Ok((total, domain_products))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let categories = products::table
            .filter(products::active.eq(true))
            .filter(products::category.is_not_null())
            .select(products::category)
            .distinct()
            .order(products::category.asc())
            .load::<Option<String>>(&mut conn)?;

        Ok(categories.into_iter().flatten().collect())
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        let db_new = DbNewProduct::from(new_product);

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;
            replace_images(conn, created.id, &new_product.images)?;
            Ok(created)
        })?;

        Ok(created.into_domain(new_product.images.clone()))
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;
        let db_updates = DbUpdateProduct::from(updates);

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let exists = products::table
                .find(product_id)
                .select(products::id)
                .first::<i32>(conn)
                .optional()?;
            if exists.is_none() {
                return Err(RepositoryError::NotFound);
            }

            let updated = diesel::update(products::table.find(product_id))
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            if let Some(images) = updates.images.as_ref() {
                replace_images(conn, product_id, images)?;
            }

            let mut image_map = load_images_for_products(conn, &[product_id])?;
            let urls = image_map.remove(&product_id).unwrap_or_default();
            Ok(updated.into_domain(urls))
        })
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::product_images;

        let mut conn = self.conn()?;
        let conn: &mut SqliteConnection = &mut conn;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(
                product_images::table.filter(product_images::product_id.eq(product_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(products::table.find(product_id)).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

/// Replace the stored image list of `product_id` with `urls`, preserving order.
fn replace_images(
    conn: &mut SqliteConnection,
    product_id: i32,
    urls: &[String],
) -> QueryResult<()> {
    use crate::schema::product_images;

    diesel::delete(product_images::table.filter(product_images::product_id.eq(product_id)))
        .execute(conn)?;

    if urls.is_empty() {
        return Ok(());
    }

    let rows = NewProductImage::for_product(product_id, urls);
    diesel::insert_into(product_images::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

fn load_images_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<String>>> {
    use crate::schema::product_images;

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_images::table
        .filter(product_images::product_id.eq_any(product_ids))
        .order((product_images::product_id.asc(), product_images::position.asc()))
        .load::<DbProductImage>(conn)?;

    let mut map: HashMap<i32, Vec<String>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row.url);
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("bolso"), "bolso");
    }
}
