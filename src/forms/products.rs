use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::image::ImageUpload;
use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{invalid_fields, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a category label.
const CATEGORY_MAX_LEN: usize = 64;
const CATEGORY_MAX_LEN_VALIDATOR: u64 = CATEGORY_MAX_LEN as u64;

/// Maximum number of images accepted in one request.
pub const MAX_IMAGES_PER_REQUEST: usize = 5;

/// Maximum size of a single uploaded image in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("campos inválidos: {}", invalid_fields(.0))]
    Validation(#[from] ValidationErrors),
    #[error("el campo `{0}` es obligatorio")]
    MissingField(&'static str),
    #[error("el nombre del producto no puede estar vacío")]
    EmptyName,
    /// Price is not a finite, non-negative number.
    #[error("precio inválido `{0}`")]
    InvalidPrice(String),
    #[error("valor inválido `{value}` para `{field}`; se espera \"true\" o \"false\"")]
    InvalidFlag { field: &'static str, value: String },
    #[error("se permiten como máximo {MAX_IMAGES_PER_REQUEST} imágenes")]
    TooManyImages,
    #[error("la imagen `{0}` supera el límite de 5MB")]
    ImageTooLarge(String),
    #[error("solo se permiten archivos de imagen (`{0}`)")]
    NotAnImage(String),
    #[error("no se pudo leer la imagen `{0}`")]
    ImageRead(String),
}

/// Multipart body of the admin create and update product requests.
#[derive(MultipartForm)]
pub struct ProductMultipartForm {
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub price: Option<Text<String>>,
    pub category: Option<Text<String>>,
    pub featured: Option<Text<String>>,
    pub active: Option<Text<String>>,
    /// JSON array with the image URLs the client wants to keep.
    #[multipart(rename = "existingImages")]
    pub existing_images: Option<Text<String>>,
    #[multipart(limit = "5MiB")]
    pub images: Vec<TempFile>,
}

impl ProductMultipartForm {
    /// Split the multipart body into its text fields and uploaded files.
    pub fn into_parts(self) -> (ProductFields, Vec<TempFile>) {
        let fields = ProductFields {
            name: self.name.map(Text::into_inner),
            description: self.description.map(Text::into_inner),
            price: self.price.map(Text::into_inner),
            category: self.category.map(Text::into_inner),
            featured: self.featured.map(Text::into_inner),
            active: self.active.map(Text::into_inner),
            existing_images: self.existing_images.map(Text::into_inner),
        };
        (fields, self.images)
    }
}

/// Text fields of a product form, as submitted.
#[derive(Debug, Default, Clone, Validate)]
pub struct ProductFields {
    #[validate(length(max = NAME_MAX_LEN_VALIDATOR))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    #[validate(length(max = CATEGORY_MAX_LEN_VALIDATOR))]
    pub category: Option<String>,
    pub featured: Option<String>,
    pub active: Option<String>,
    pub existing_images: Option<String>,
}

impl ProductFields {
    /// Validates the fields into a domain `NewProduct` without images.
    ///
    /// `name` and `price` are required; `active` defaults to true and
    /// `featured` to false.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let name = self.name.ok_or(ProductFormError::MissingField("name"))?;
        let name = sanitize_name(&name)?;
        let price = self.price.ok_or(ProductFormError::MissingField("price"))?;
        let price = parse_price(&price)?;

        let mut product = NewProduct::new(name, price)
            .featured(parse_flag("featured", self.featured.as_deref())?.unwrap_or(false))
            .active(parse_flag("active", self.active.as_deref())?.unwrap_or(true));

        if let Some(description) = self.description.as_deref().and_then(clean_description) {
            product = product.with_description(description);
        }

        if let Some(category) = self.category.as_deref().and_then(clean_category) {
            product = product.with_category(category);
        }

        Ok(product)
    }

    /// Validates the fields into a domain `UpdateProduct` leaving images untouched.
    ///
    /// Absent fields are not changed. An empty `description` or `category`
    /// clears the stored value.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let mut updates = UpdateProduct::new();

        if let Some(name) = self.name.as_deref() {
            updates = updates.name(sanitize_name(name)?);
        }

        if let Some(price) = self.price.as_deref() {
            updates = updates.price(parse_price(price)?);
        }

        if let Some(description) = self.description.as_deref() {
            updates = updates.description(clean_description(description));
        }

        if let Some(category) = self.category.as_deref() {
            updates = updates.category(clean_category(category));
        }

        if let Some(featured) = parse_flag("featured", self.featured.as_deref())? {
            updates = updates.featured(featured);
        }

        if let Some(active) = parse_flag("active", self.active.as_deref())? {
            updates = updates.active(active);
        }

        Ok(updates)
    }

    /// Image URLs the client asked to keep, in submitted order.
    pub fn retained_images(&self) -> Vec<String> {
        parse_existing_images(self.existing_images.as_deref())
    }
}

/// Parse the `existingImages` field.
///
/// Anything other than a JSON array yields an empty list; non-string array
/// elements are skipped.
pub fn parse_existing_images(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        Ok(_) => {
            log::warn!("existingImages is not a JSON array; treating it as empty");
            Vec::new()
        }
        Err(err) => {
            log::warn!("Failed to parse existingImages: {err}");
            Vec::new()
        }
    }
}

/// Check and read uploaded image files into memory.
///
/// Empty parts without a filename (a file input left blank) are ignored.
pub fn read_image_uploads(files: Vec<TempFile>) -> ProductFormResult<Vec<ImageUpload>> {
    let files: Vec<TempFile> = files
        .into_iter()
        .filter(|file| {
            file.size > 0
                || file
                    .file_name
                    .as_deref()
                    .is_some_and(|name| !name.trim().is_empty())
        })
        .collect();

    if files.len() > MAX_IMAGES_PER_REQUEST {
        return Err(ProductFormError::TooManyImages);
    }

    let mut uploads = Vec::with_capacity(files.len());

    for file in files {
        let display_name = file.file_name.clone().unwrap_or_else(|| "imagen".to_string());

        if file.size > MAX_IMAGE_BYTES {
            return Err(ProductFormError::ImageTooLarge(display_name));
        }

        let content_type = file
            .content_type
            .as_ref()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if !is_image_content_type(&content_type) {
            return Err(ProductFormError::NotAnImage(display_name));
        }

        let bytes = std::fs::read(file.file.path()).map_err(|err| {
            log::error!("Failed to read uploaded file {display_name}: {err}");
            ProductFormError::ImageRead(display_name.clone())
        })?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ProductFormError::ImageTooLarge(display_name));
        }

        uploads.push(ImageUpload::new(file.file_name, content_type, bytes));
    }

    Ok(uploads)
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split_once('/')
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("image") && !subtype.is_empty())
}

fn sanitize_name(input: &str) -> ProductFormResult<String> {
    let name = sanitize_inline_text(input);
    if name.is_empty() {
        return Err(ProductFormError::EmptyName);
    }
    if name.chars().count() > NAME_MAX_LEN {
        let mut errors = ValidationErrors::new();
        errors.add("name", validator::ValidationError::new("length"));
        return Err(errors.into());
    }
    Ok(name)
}

fn parse_price(input: &str) -> ProductFormResult<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(ProductFormError::InvalidPrice(trimmed.to_string())),
    }
}

fn parse_flag(field: &'static str, value: Option<&str>) -> ProductFormResult<Option<bool>> {
    let Some(value) = value.map(str::trim) else {
        return Ok(None);
    };

    if value.eq_ignore_ascii_case("true") {
        Ok(Some(true))
    } else if value.eq_ignore_ascii_case("false") {
        Ok(Some(false))
    } else {
        Err(ProductFormError::InvalidFlag {
            field,
            value: value.to_string(),
        })
    }
}

fn clean_description(input: &str) -> Option<String> {
    Some(sanitize_multiline_text(input)).filter(|value| !value.is_empty())
}

fn clean_category(input: &str) -> Option<String> {
    Some(sanitize_inline_text(input)).filter(|value| !value.is_empty())
}
