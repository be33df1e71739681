//! Cart commands.
//!
//! Each mutating command prints the resulting cart on success. On failure
//! the store has already emitted its notification; the error is returned so
//! the process exits non-zero.

use rocketshoes_cart::{Cart, CartStore, ProductId};
use tracing::info;

use super::CommandError;

/// Print the current cart.
pub fn show(store: &CartStore) {
    print_cart(&store.cart());
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns the store error if the product could not be added.
pub async fn add(store: &CartStore, id: ProductId) -> Result<(), CommandError> {
    let cart = store.add_product(id).await?;
    info!(product_id = %id, "Product added");
    print_cart(&cart);
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns the store error if the product could not be removed.
pub async fn remove(store: &CartStore, id: ProductId) -> Result<(), CommandError> {
    let cart = store.remove_product(id).await?;
    info!(product_id = %id, "Product removed");
    print_cart(&cart);
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns the store error if the quantity could not be changed.
pub async fn update(store: &CartStore, id: ProductId, amount: i64) -> Result<(), CommandError> {
    let cart = store.update_product_amount(id, amount).await?;
    info!(product_id = %id, amount, "Product amount updated");
    print_cart(&cart);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    print!("{}", render(cart));
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut lines = vec![format!(
        "{:>4}  {:<58} {:>10} {:>4} {:>11}",
        "ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"
    )];
    lines.extend(cart.items().iter().map(|item| {
        format!(
            "{:>4}  {:<58} {:>10} {:>4} {:>11}",
            item.id.as_i32(),
            item.title,
            item.price.to_string(),
            item.amount,
            item.line_total().to_string(),
        )
    }));
    lines.push(format!(
        "{} item(s), total {}",
        cart.item_count(),
        cart.subtotal()
    ));

    lines.join("\n") + "\n"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_cart::default_cart;

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_default_cart() {
        let out = render(&default_cart());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("PRODUCT"));
        assert!(lines[1].contains("Tênis de Caminhada Leve Confortável"));
        assert!(lines[1].contains("$179.90"));
        assert!(lines[1].contains("$359.80"));
        assert!(lines[2].contains("$139.90"));
        assert_eq!(lines[3], "3 item(s), total $499.70");
    }

    #[test]
    fn test_render_rows_are_newline_terminated() {
        let out = render(&default_cart());

        assert!(out.ends_with("total $499.70\n"));
        assert!(!out.ends_with("\n\n"));
        assert!(out.starts_with("  ID  PRODUCT"));
    }
}
