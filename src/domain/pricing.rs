//! Pricing rules for a configured garment.
//!
//! Rules are evaluated top to bottom and each one adds to the running total:
//! base price by product and color tier, heavy-material surcharge (t-shirts
//! only), a flat text surcharge past the free characters, and an attachment
//! surcharge.

use crate::domain::order::{Color, Material, Price, Product};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Characters printed for free; anything longer pays [`text_surcharge`] once.
pub const FREE_TEXT_CHARS: usize = 8;

fn base_price(product: Product, color: Color) -> Decimal {
    match (product, color.is_basic()) {
        (Product::Tshirt, true) => dec!(16.95),
        (Product::Tshirt, false) => dec!(18.95),
        (Product::Sweater, true) => dec!(28.95),
        (Product::Sweater, false) => dec!(32.95),
    }
}

pub fn material_surcharge() -> Price {
    Price::new(dec!(3.00))
}

pub fn text_surcharge() -> Price {
    Price::new(dec!(5.00))
}

pub fn attachment_surcharge() -> Price {
    Price::new(dec!(10.00))
}

/// Computes the price of an order from its selections. Pure and total.
pub fn compute_price(
    product: Product,
    color: Color,
    material: Material,
    text_len: usize,
    has_attachment: bool,
) -> Price {
    let mut price = Price::new(base_price(product, color));

    if product == Product::Tshirt && material == Material::Heavy {
        price += material_surcharge();
    }
    if text_len > FREE_TEXT_CHARS {
        price += text_surcharge();
    }
    if has_attachment {
        price += attachment_surcharge();
    }

    price
}
