//! Catalog product types.
//!
//! Products are immutable once fetched and identified by [`ProductId`].
//! A product without a price is shown in the catalog but cannot be bought.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Unique identifier for a product
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new `ProductId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Price in whole currency units
///
/// The backend only sends non-negative integer prices (or `null` for items
/// not for sale). A fractional or negative `price` does not decode, and
/// neither does the catalog response that carries it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a new price
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the amount
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Soft skill
    SoftSkill,
    /// Hard skill
    HardSkill,
    /// Button
    Button,
    /// Additional
    Additional,
    /// Anything the backend sends that is not one of the above
    #[serde(other)]
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoftSkill => write!(f, "soft-skill"),
            Self::HardSkill => write!(f, "hard-skill"),
            Self::Button => write!(f, "button"),
            Self::Additional => write!(f, "additional"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Product description: a single paragraph or a list of lines
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    /// One block of text
    Text(String),
    /// Several lines, rendered in order
    Lines(Vec<String>),
}

impl Default for Description {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Lines(lines) => write!(f, "{}", lines.join("\n")),
        }
    }
}

/// A catalog product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductItem {
    /// Unique identifier
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Long description
    #[serde(default)]
    pub description: Description,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Category
    pub category: Category,
    /// Price, or `None` when the product is not for sale
    pub price: Option<Price>,
}

impl ProductItem {
    /// Creates a product with an empty description and image
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        category: Category,
        price: Option<Price>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: Description::default(),
            image: String::new(),
            category,
            price,
        }
    }

    /// Whether the product can be put in the basket
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.price.is_some()
    }
}
