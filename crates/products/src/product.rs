use serde::{Deserialize, Deserializer, Serialize};

use stockroom_core::{DomainError, Money, Price, ProductId};

/// Quantity below which a product counts as low on stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Reorder threshold the v2 API assumes when a record carries none.
pub const DEFAULT_MINIMUM_STOCK: u32 = 5;

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_CATEGORY_LEN: usize = 100;

/// Product record as served by the remote repository.
///
/// The client only ever holds a read-only cached copy; changes go through
/// [`ProductDraft`] and come back as a fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub category: String,
    pub price: Price,
    pub initial_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<u32>,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.initial_quantity == 0
    }

    pub fn is_in_stock(&self) -> bool {
        self.initial_quantity > 0
    }

    /// Out-of-stock products are also low on stock.
    pub fn is_low_stock(&self) -> bool {
        self.initial_quantity < LOW_STOCK_THRESHOLD
    }

    /// Whether the quantity is at or below the product's own reorder threshold.
    pub fn is_below_minimum(&self) -> bool {
        self.initial_quantity <= self.minimum_stock.unwrap_or(DEFAULT_MINIMUM_STOCK)
    }

    pub fn stock_value(&self) -> Money {
        self.price.times(self.initial_quantity)
    }

    /// Editable fields of this record, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            price: self.price,
            initial_quantity: self.initial_quantity,
        }
    }
}

/// Request body for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Price,
    pub initial_quantity: u32,
}

impl ProductDraft {
    /// Check the draft before it is sent. Price and quantity are already
    /// non-negative by construction.
    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("name", &self.name, MAX_NAME_LEN)?;
        require_text("description", &self.description, MAX_DESCRIPTION_LEN)?;
        require_text("category", &self.category, MAX_CATEGORY_LEN)?;
        Ok(())
    }

    /// Materialize the record the server is expected to return for this draft.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            initial_quantity: self.initial_quantity,
            minimum_stock: None,
        }
    }
}

fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if value.chars().count() > max_len {
        return Err(DomainError::validation(format!(
            "{field} cannot exceed {max_len} characters"
        )));
    }
    Ok(())
}

fn nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
