use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub featured: bool,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
    pub category: Option<&'a str>,
    pub featured: bool,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update; `None` fields are left untouched by Diesel.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub price: Option<f64>,
    pub category: Option<Option<&'a str>>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Convert into the domain type, attaching the ordered image URLs.
    pub fn into_domain(self, images: Vec<String>) -> DomainProduct {
        DomainProduct {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            images,
            featured: self.featured,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            description: value.description.as_deref(),
            price: value.price,
            category: value.category.as_deref(),
            featured: value.featured,
            active: value.active,
            created_at: value.created_at,
            updated_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_deref(),
            description: value.description.as_ref().map(|inner| inner.as_deref()),
            price: value.price,
            category: value.category.as_ref().map(|inner| inner.as_deref()),
            featured: value.featured,
            active: value.active,
            updated_at: value.updated_at,
        }
    }
}
