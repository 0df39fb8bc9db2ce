//! Inventory domain module.
//!
//! Stock movements (goods in/out, returns, losses, manual adjustments) as the
//! stock API records them, plus the local checks run before one is sent
//! (no IO, no HTTP, no storage).

pub mod movement;

pub use movement::{plan_movement, MovementKind, MovementPlan, MovementRequest, StockMovement};
