use core::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, ProductId};
use stockroom_products::Product;

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    StockIn,
    StockOut,
    Adjustment,
    Return,
    Loss,
    /// Recorded by the server when a product is created; never requested.
    Initial,
}

impl MovementKind {
    /// Path segment under the stock API, `None` for server-only kinds.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            MovementKind::StockIn => Some("in"),
            MovementKind::StockOut => Some("out"),
            MovementKind::Adjustment => Some("adjustment"),
            MovementKind::Return => Some("return"),
            MovementKind::Loss => Some("loss"),
            MovementKind::Initial => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MovementKind::StockIn => "Stock In",
            MovementKind::StockOut => "Stock Out",
            MovementKind::Adjustment => "Inventory Adjustment",
            MovementKind::Return => "Return",
            MovementKind::Loss => "Loss or Damage",
            MovementKind::Initial => "Initial Stock",
        }
    }
}

impl FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(MovementKind::StockIn),
            "out" => Ok(MovementKind::StockOut),
            "adjustment" | "adjust" => Ok(MovementKind::Adjustment),
            "return" => Ok(MovementKind::Return),
            "loss" => Ok(MovementKind::Loss),
            other => Err(DomainError::validation(format!(
                "movement must be one of: in, out, adjustment, return, loss (got '{other}')"
            ))),
        }
    }
}

/// Request body for the stock API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_quantity: Option<u32>,
}

/// A recorded movement, as returned by the stock API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub reason: Option<String>,
    pub movement_type: MovementKind,
    pub previous_quantity: u32,
    pub new_quantity: u32,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A validated movement together with the quantity it is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementPlan {
    pub kind: MovementKind,
    pub request: MovementRequest,
    pub previous_quantity: u32,
    pub new_quantity: u32,
}

/// Validate a movement against the cached product before sending it.
///
/// `amount` is the number of units moved, or the target quantity for an
/// adjustment. Outbound movements may not exceed the available stock.
pub fn plan_movement(
    product: &Product,
    kind: MovementKind,
    amount: u32,
    reason: Option<String>,
) -> Result<MovementPlan, DomainError> {
    let previous = product.initial_quantity;
    let reason = reason.filter(|r| !r.trim().is_empty());
    if reason.as_ref().is_some_and(|r| r.chars().count() > 500) {
        return Err(DomainError::validation("reason cannot exceed 500 characters"));
    }
    if amount == 0 {
        return Err(DomainError::validation("quantity must be greater than zero"));
    }

    let (quantity, new_quantity, target) = match kind {
        MovementKind::StockIn | MovementKind::Return => {
            let new = previous
                .checked_add(amount)
                .ok_or_else(|| DomainError::invariant("stock quantity overflow"))?;
            (amount, new, None)
        }
        MovementKind::StockOut | MovementKind::Loss => {
            if amount > previous {
                return Err(DomainError::invariant(format!(
                    "insufficient stock: available {previous}, requested {amount}"
                )));
            }
            (amount, previous - amount, None)
        }
        MovementKind::Adjustment => (previous.abs_diff(amount).max(1), amount, Some(amount)),
        MovementKind::Initial => {
            return Err(DomainError::validation(
                "initial stock is recorded by the server and cannot be requested",
            ));
        }
    };

    Ok(MovementPlan {
        kind,
        request: MovementRequest {
            product_id: product.id.clone(),
            quantity,
            reason,
            new_quantity: target,
        },
        previous_quantity: previous,
        new_quantity,
    })
}
