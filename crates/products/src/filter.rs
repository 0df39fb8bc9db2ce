//! Filter state of the product list.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, Price};

use crate::product::Product;

/// Stock bucket a product must fall into to be listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    #[default]
    All,
    /// Quantity below [`crate::LOW_STOCK_THRESHOLD`] (includes out of stock).
    Low,
    Out,
    In,
}

impl StockFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockFilter::All => "all",
            StockFilter::Low => "low",
            StockFilter::Out => "out",
            StockFilter::In => "in",
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::Low => product.is_low_stock(),
            StockFilter::Out => product.is_out_of_stock(),
            StockFilter::In => product.is_in_stock(),
        }
    }
}

impl FromStr for StockFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StockFilter::All),
            "low" => Ok(StockFilter::Low),
            "out" => Ok(StockFilter::Out),
            "in" => Ok(StockFilter::In),
            other => Err(DomainError::validation(format!(
                "stock filter must be one of: all, low, out, in (got '{other}')"
            ))),
        }
    }
}

/// Exact-match category restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    /// `"all"` is the dropdown's sentinel for "no restriction".
    fn from(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }
}

/// Inclusive price bounds. `max: None` is unbounded.
///
/// `min <= max` is not enforced; an inverted range simply matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Option<Price>,
}

impl PriceRange {
    pub fn new(min: Price, max: Price) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: Price) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, price: Price) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// Everything the user can narrow the list by, plus the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub category: CategoryFilter,
    pub price_range: PriceRange,
    pub stock: StockFilter,
    /// 1-based.
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: CategoryFilter::All,
            price_range: PriceRange::default(),
            stock: StockFilter::All,
            page: 1,
        }
    }
}

impl FilterState {
    /// Whether `product` passes every active predicate. `page` plays no part.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.category.matches(product)
            && self.price_range.contains(product.price)
            && self.stock.matches(product)
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        [&product.name, &product.description, &product.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
