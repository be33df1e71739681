//! The cart a brand-new storage is seeded with.

use rocketshoes_core::{Cart, LineItem, Price, ProductId};

/// The two-item cart written on first run.
#[must_use]
pub fn default_cart() -> Cart {
    Cart::from_items(default_items().into()).unwrap_or_default()
}

fn default_items() -> [LineItem; 2] {
    [
        LineItem {
            id: ProductId::new(1),
            title: "Tênis de Caminhada Leve Confortável".to_string(),
            price: Price::from_parts(1799, 1),
            image: "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg"
                .to_string(),
            amount: 2,
        },
        LineItem {
            id: ProductId::new(2),
            title: "Tênis VR Caminhada Confortável Detalhes Couro Masculino".to_string(),
            price: Price::from_parts(1399, 1),
            image: "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis2.jpg"
                .to_string(),
            amount: 1,
        },
    ]
}
