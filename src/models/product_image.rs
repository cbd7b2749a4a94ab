use diesel::prelude::*;

/// Diesel model representing the `product_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub position: i32,
    pub url: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage<'a> {
    pub product_id: i32,
    pub position: i32,
    pub url: &'a str,
}

impl<'a> NewProductImage<'a> {
    /// Build insertable rows for `urls`, numbering positions in list order.
    pub fn for_product(product_id: i32, urls: &'a [String]) -> Vec<Self> {
        urls.iter()
            .zip(0..)
            .map(|(url, position)| Self {
                product_id,
                position,
                url: url.as_str(),
            })
            .collect()
    }
}
