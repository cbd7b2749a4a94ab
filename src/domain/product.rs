use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Domain representation of a catalog product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description shown to shoppers.
    pub description: Option<String>,
    /// Non-negative unit price.
    pub price: f64,
    /// Free-form category label.
    pub category: Option<String>,
    /// Public image URLs in display order.
    pub images: Vec<String>,
    /// Presentation hint for highlighting the product.
    pub featured: bool,
    /// Whether the product is visible in the public catalog.
    pub active: bool,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub featured: bool,
    pub active: bool,
    /// Timestamp captured when the product payload was created.
    pub created_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new active, non-featured product payload stamped with the current time.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category: None,
            images: Vec::new(),
            featured: false,
            active: true,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a category label to the product payload.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the image list of the product payload.
    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Patch data applied when updating an existing product.
///
/// `None` leaves a field untouched. The nested options on `description` and
/// `category` distinguish "keep" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub category: Option<Option<String>>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
    /// Replacement image list; `None` keeps the stored images.
    pub images: Option<Vec<String>>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateProduct {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateProduct {
    /// Create a new patch object with no changes applied yet.
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            price: None,
            category: None,
            featured: None,
            active: None,
            images: None,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Update the description, using `None` to clear an existing value.
    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(Into::into));
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Update the category, using `None` to clear an existing value.
    pub fn category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = Some(category.map(Into::into));
        self
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = Some(featured);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Replace the stored image list with `images`.
    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }
}

/// Active-state restriction applied to a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFilter {
    /// Both active and inactive products.
    #[default]
    Any,
    /// Only products visible in the public catalog.
    Active,
    /// Only hidden products.
    Inactive,
}

impl ActiveFilter {
    /// Parse the tri-state `active` query value.
    ///
    /// `"true"` and `"false"` restrict the listing; anything else, including an
    /// absent value, means no restriction.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("true") => Self::Active,
            Some("false") => Self::Inactive,
            _ => Self::Any,
        }
    }
}

/// Query definition used to list catalog products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Exact, case-sensitive category filter.
    pub category: Option<String>,
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    /// Active-state restriction.
    pub active: ActiveFilter,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results to products with exactly this category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active(mut self, active: ActiveFilter) -> Self {
        self.active = active;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
