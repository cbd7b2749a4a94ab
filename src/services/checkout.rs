use crate::config::CheckoutConfig;
use crate::domain::cart::{Cart, CustomerDetails, OrderMessage};
use crate::forms::checkout::CheckoutForm;
use crate::repository::ProductReader;
use crate::services::{ServiceError, ServiceResult};

const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Price the submitted cart against the catalog and build the order hand-off.
///
/// Products are re-read so names and prices come from the catalog rather than
/// the client. Unknown or inactive products reject the order.
pub fn build_order_message<R>(
    repo: &R,
    config: &CheckoutConfig,
    form: CheckoutForm,
) -> ServiceResult<OrderMessage>
where
    R: ProductReader + ?Sized,
{
    let (customer, lines) = form.into_order()?;

    let mut cart = Cart::new();
    for (product_id, quantity) in lines {
        let product = repo
            .get_product_by_id(product_id)
            .map_err(ServiceError::query)?
            .filter(|product| product.active)
            .ok_or_else(|| {
                ServiceError::Validation(format!("el producto {product_id} no está disponible"))
            })?;
        cart.add(product, quantity);
    }

    let message = compose_message(&customer, &cart);
    let url = whatsapp_link(&config.whatsapp_number, &message)?;

    Ok(OrderMessage {
        message,
        url,
        total: cart.total_price(),
    })
}

fn compose_message(customer: &CustomerDetails, cart: &Cart) -> String {
    let mut message = format!("*Nuevo Pedido de {}*\n\n", customer.full_name);

    message.push_str("*Información del Cliente:*\n");
    message.push_str(&format!("Nombre: {}\n", customer.full_name));
    message.push_str(&format!("Dirección: {}\n", customer.address));
    message.push_str(&format!("Ciudad: {}\n", customer.city));
    message.push_str(&format!("Teléfono: {}\n\n", customer.phone_number));

    message.push_str("*Productos:*\n");
    for (index, item) in cart.items().iter().enumerate() {
        message.push_str(&format!(
            "{}. {} x {} - ${}\n",
            index + 1,
            item.product.name,
            item.quantity,
            format_amount(item.line_total())
        ));
    }

    message.push_str(&format!(
        "\n*Total: ${}*\n\n",
        format_amount(cart.total_price())
    ));
    message.push_str("Gracias por tu compra!");

    message
}

fn whatsapp_link(number: &str, message: &str) -> ServiceResult<String> {
    let query = serde_html_form::to_string(vec![("text", message)])
        .map_err(|err| ServiceError::Internal(format!("failed to encode order message: {err}")))?;
    Ok(format!("{WHATSAPP_BASE_URL}/{number}?{query}"))
}

/// Format an amount with `,` thousands separators and at most two decimals.
fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (index, digit) in units.chars().enumerate() {
        if index > 0 && (units.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        0 => format!("{sign}{grouped}"),
        f if f % 10 == 0 => format!("{sign}{grouped}.{}", f / 10),
        f => format!("{sign}{grouped}.{f:02}"),
    }
}
