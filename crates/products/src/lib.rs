//! Products domain module.
//!
//! This crate contains the cached product record and the pure product list view
//! model (filtering, paging, summary statistics), implemented as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod filter;
pub mod form;
pub mod product;
pub mod state;
pub mod view;

pub use filter::{CategoryFilter, FilterState, PriceRange, StockFilter};
pub use form::ProductForm;
pub use product::{Product, ProductDraft, DEFAULT_MINIMUM_STOCK, LOW_STOCK_THRESHOLD};
pub use state::{reduce, ListAction, ListState};
pub use view::{build_view, distinct_categories, ProductListView, SummaryStats, DEFAULT_PAGE_SIZE};
