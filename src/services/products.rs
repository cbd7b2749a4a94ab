use serde::{Deserialize, Serialize};

use crate::domain::image::ImageUpload;
use crate::domain::product::{ActiveFilter, Product, ProductListQuery};
use crate::forms::products::ProductFields;
use crate::repository::{ProductReader, ProductWriter};
use crate::services::images::{
    plan_image_changes, remove_images_best_effort, upload_images,
};
use crate::services::{ServiceError, ServiceResult};
use crate::storage::ImageStorage;

/// Page used when the request does not ask for a valid one.
pub const DEFAULT_PAGE: usize = 1;
/// Page size used when the request does not ask for a valid one.
pub const DEFAULT_LIMIT: usize = 8;

/// Category values meaning "every category".
const CATEGORY_SENTINELS: [&str; 2] = ["all", "todos"];

/// Raw query parameters of the catalog listing.
///
/// Values are kept as strings so malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CatalogParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub active: Option<String>,
}

impl CatalogParams {
    /// Resolve the parameters into a repository query plus the page and limit used.
    pub fn into_query(self) -> (ProductListQuery, usize, usize) {
        let page = parse_positive(self.page.as_deref(), DEFAULT_PAGE);
        let limit = parse_positive(self.limit.as_deref(), DEFAULT_LIMIT);

        let mut query = ProductListQuery::new()
            .active(ActiveFilter::from_param(self.active.as_deref()))
            .paginate(page, limit);

        if let Some(category) = self.category.filter(|category| {
            let trimmed = category.trim();
            !trimmed.is_empty() && !CATEGORY_SENTINELS.contains(&trimmed)
        }) {
            query = query.category(category);
        }

        if let Some(search) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
        {
            query = query.search(search);
        }

        (query, page, limit)
    }
}

fn parse_positive(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

/// One page of the catalog.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub current_page: usize,
    /// `ceil(total_products / limit)`; zero when nothing matches.
    pub total_pages: usize,
    pub total_products: usize,
}

/// Lists catalog products matching `params`.
pub fn list_products<R>(repo: &R, params: CatalogParams) -> ServiceResult<ProductPage>
where
    R: ProductReader + ?Sized,
{
    let (query, page, limit) = params.into_query();

    let (total, products) = repo.list_products(query).map_err(ServiceError::query)?;

    Ok(ProductPage {
        products,
        current_page: page,
        total_pages: total.div_ceil(limit),
        total_products: total,
    })
}

/// Fetches a single product, active or not.
pub fn get_product<R>(repo: &R, product_id: i32) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::query)?
        .ok_or(ServiceError::NotFound)
}

/// Distinct categories of active products.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<String>>
where
    R: ProductReader + ?Sized,
{
    repo.list_categories().map_err(ServiceError::query)
}

/// Creates a product, uploading its images first.
///
/// No record is written if any upload fails.
pub fn create_product<R, S>(
    repo: &R,
    storage: &S,
    fields: ProductFields,
    uploads: Vec<ImageUpload>,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
    S: ImageStorage + ?Sized,
{
    let new_product = fields.into_new_product()?;

    let image_urls = upload_images(storage, &uploads)?;
    let new_product = new_product.with_images(image_urls.clone());

    match repo.create_product(&new_product) {
        Ok(product) => Ok(product),
        Err(err) => {
            log::error!("Failed to create product: {err}");
            remove_images_best_effort(storage, &image_urls);
            Err(ServiceError::persistence(err))
        }
    }
}

/// Applies an admin edit to a product and reconciles its images.
///
/// New images are uploaded before the record is written; images the client
/// dropped are deleted only after the write succeeds.
pub fn update_product<R, S>(
    repo: &R,
    storage: &S,
    product_id: i32,
    fields: ProductFields,
    uploads: Vec<ImageUpload>,
) -> ServiceResult<Product>
where
    R: ProductReader + ProductWriter + ?Sized,
    S: ImageStorage + ?Sized,
{
    let retained = fields.retained_images();
    let updates = fields.into_update_product()?;

    let current = get_product(repo, product_id)?;
    let plan = plan_image_changes(&current.images, &retained);

    let new_urls = upload_images(storage, &uploads)?;
    let updates = updates.images(plan.final_images(&new_urls));

    let updated = match repo.update_product(product_id, &updates) {
        Ok(product) => product,
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            remove_images_best_effort(storage, &new_urls);
            return Err(ServiceError::persistence(err));
        }
    };

    remove_images_best_effort(storage, &plan.to_delete);

    Ok(updated)
}

/// Deletes a product together with its stored images.
pub fn delete_product<R, S>(repo: &R, storage: &S, product_id: i32) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter + ?Sized,
    S: ImageStorage + ?Sized,
{
    let current = get_product(repo, product_id)?;

    remove_images_best_effort(storage, &current.images);

    repo.delete_product(product_id)
        .map_err(ServiceError::persistence)
}
