use crate::domain::attachment::Attachment;
use crate::error::{OrderError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Maximum number of characters that can be printed on a garment.
pub const MAX_TEXT_CHARS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    #[default]
    Tshirt,
    Sweater,
}

impl Product {
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Tshirt => "tshirt",
            Product::Sweater => "sweater",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Product::Tshirt => "T-Shirt",
            Product::Sweater => "Sweater",
        }
    }

    /// Colors this product can be ordered in.
    pub fn palette(&self) -> &'static [Color] {
        match self {
            Product::Tshirt => &[Color::Black, Color::White, Color::Green, Color::Red],
            Product::Sweater => &[Color::Black, Color::White, Color::Pink, Color::Yellow],
        }
    }

    pub fn offers(&self, color: Color) -> bool {
        self.palette().contains(&color)
    }

    /// Material only changes anything for t-shirts.
    pub fn has_material_choice(&self) -> bool {
        matches!(self, Product::Tshirt)
    }
}

impl FromStr for Product {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tshirt" | "t-shirt" => Ok(Product::Tshirt),
            "sweater" => Ok(Product::Sweater),
            other => Err(OrderError::InvalidInput(format!("unknown product '{other}'"))),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Black,
    White,
    Green,
    Red,
    Pink,
    Yellow,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Green => "green",
            Color::Red => "red",
            Color::Pink => "pink",
            Color::Yellow => "yellow",
        }
    }

    /// Black and white are priced at the basic tier.
    pub fn is_basic(&self) -> bool {
        matches!(self, Color::Black | Color::White)
    }
}

impl FromStr for Color {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" => Ok(Color::Black),
            "white" => Ok(Color::White),
            "green" => Ok(Color::Green),
            "red" => Ok(Color::Red),
            "pink" => Ok(Color::Pink),
            "yellow" => Ok(Color::Yellow),
            other => Err(OrderError::InvalidInput(format!("unknown color '{other}'"))),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Light,
    Heavy,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Light => "light",
            Material::Heavy => "heavy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Material::Light => "Light Cotton",
            Material::Heavy => "Heavy Cotton (+$3)",
        }
    }
}

impl FromStr for Material {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Material::Light),
            "heavy" => Ok(Material::Heavy),
            other => Err(OrderError::InvalidInput(format!("unknown material '{other}'"))),
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text printed on the garment, at most [`MAX_TEXT_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderText(String);

impl OrderText {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(OrderError::InvalidInput(format!(
                "text is {chars} characters, at most {MAX_TEXT_CHARS} are allowed"
            )));
        }
        Ok(Self(text))
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrderText {
    type Error = OrderError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<OrderText> for String {
    fn from(text: OrderText) -> Self {
        text.0
    }
}

/// A non-negative order price in dollars.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Plain two-decimal form used on the wire, e.g. `21.95`.
    pub fn to_form_value(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Snapshot of an order taken at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPayload {
    pub product: Product,
    pub color: Color,
    pub material: Material,
    pub text: OrderText,
    pub price: Price,
    pub image: Option<Attachment>,
}

impl OrderPayload {
    /// The text fields of the submission form, in wire order.
    pub fn form_fields(&self) -> [(&'static str, String); 5] {
        [
            ("product", self.product.as_str().to_string()),
            ("color", self.color.as_str().to_string()),
            ("material", self.material.as_str().to_string()),
            ("text", self.text.as_str().to_string()),
            ("price", self.price.to_form_value()),
        ]
    }
}
