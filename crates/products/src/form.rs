//! Raw create/edit form input.

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, Price};

use crate::product::{Product, ProductDraft};

/// Text the user typed into the product form, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub initial_quantity: String,
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            initial_quantity: product.initial_quantity.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Parse and validate the form into a request body.
    pub fn to_draft(&self) -> Result<ProductDraft, DomainError> {
        let price: Price = self.price.parse()?;
        let initial_quantity: u32 = self.initial_quantity.trim().parse().map_err(|_| {
            DomainError::validation(format!(
                "'{}' is not a valid quantity",
                self.initial_quantity
            ))
        })?;

        let draft = ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            price,
            initial_quantity,
        };
        draft.validate()?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        ProductForm {
            name: " Laptop ".to_string(),
            description: "Gaming Laptop".to_string(),
            category: "Electronics".to_string(),
            price: "999.99".to_string(),
            initial_quantity: "10".to_string(),
        }
    }

    #[test]
    fn to_draft_parses_and_trims() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.name, "Laptop");
        assert_eq!(draft.price, Price::from_cents(99_999));
        assert_eq!(draft.initial_quantity, 10);
    }

    #[test]
    fn to_draft_rejects_negative_quantity_and_bad_price() {
        let mut form = filled();
        form.initial_quantity = "-3".to_string();
        assert!(matches!(form.to_draft(), Err(DomainError::Validation(_))));

        let mut form = filled();
        form.price = "abc".to_string();
        assert!(matches!(form.to_draft(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn clear_resets_every_field() {
        let mut form = filled();
        form.clear();
        assert!(form.is_empty());
    }
}
