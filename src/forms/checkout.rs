use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::cart::CustomerDetails;
use crate::forms::{invalid_fields, sanitize_inline_text};

/// Number of digits a customer phone number must have.
const PHONE_DIGITS: usize = 10;

/// Upper bound on distinct lines in a single order.
const MAX_ITEMS_VALIDATOR: u64 = 100;

#[derive(Debug, Error, PartialEq)]
pub enum CheckoutFormError {
    #[error("el campo `{0}` es obligatorio")]
    MissingField(&'static str),
    #[error("ingresa un número válido de {PHONE_DIGITS} dígitos")]
    InvalidPhone,
    #[error("el carrito está vacío")]
    EmptyCart,
    #[error("la cantidad del producto {0} debe ser mayor que cero")]
    InvalidQuantity(i32),
    #[error("campos inválidos: {}", invalid_fields(.0))]
    Validation(#[from] ValidationErrors),
}

/// Line of the cart submitted at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItemForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Checkout payload: delivery details plus the cart lines.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutForm {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    #[validate(length(max = MAX_ITEMS_VALIDATOR))]
    pub items: Vec<CheckoutItemForm>,
}

impl CheckoutForm {
    /// Validate the payload into customer details and `(product_id, quantity)` lines.
    pub fn into_order(self) -> Result<(CustomerDetails, Vec<(i32, u32)>), CheckoutFormError> {
        self.validate()?;

        let full_name = required("fullName", &self.full_name)?;
        let address = required("address", &self.address)?;
        let city = required("city", &self.city)?;

        let phone_number: String = self
            .phone_number
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();
        if phone_number.is_empty() {
            return Err(CheckoutFormError::MissingField("phoneNumber"));
        }
        if phone_number.len() != PHONE_DIGITS || !phone_number.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(CheckoutFormError::InvalidPhone);
        }

        if self.items.is_empty() {
            return Err(CheckoutFormError::EmptyCart);
        }
        if let Some(item) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(CheckoutFormError::InvalidQuantity(item.product_id));
        }

        let lines = self
            .items
            .into_iter()
            .map(|item| (item.product_id, item.quantity))
            .collect();

        Ok((
            CustomerDetails {
                full_name,
                address,
                city,
                phone_number,
            },
            lines,
        ))
    }
}

fn required(field: &'static str, value: &str) -> Result<String, CheckoutFormError> {
    let value = sanitize_inline_text(value);
    if value.is_empty() {
        return Err(CheckoutFormError::MissingField(field));
    }
    Ok(value)
}
