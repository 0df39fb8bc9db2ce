//! Product list UI state and its single update function.
//!
//! `ListState` is never mutated in place by callers: every interaction is a
//! [`ListAction`] fed through [`reduce`], which returns the next state. This
//! keeps the view model a pure function of the state.

use serde::{Deserialize, Serialize};

use stockroom_core::ProductId;

use crate::filter::{CategoryFilter, FilterState, PriceRange, StockFilter};
use crate::product::Product;
use crate::view::{build_view, ProductListView, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    pub products: Vec<Product>,
    pub filter: FilterState,
    pub page_size: usize,
    pub loading: bool,
    /// Message shown in the error region, if any.
    pub error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            filter: FilterState::default(),
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            error: None,
        }
    }
}

impl ListState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn view(&self) -> ProductListView<'_> {
        build_view(&self.products, &self.filter, self.page_size)
    }

    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    LoadStarted,
    ProductsLoaded(Vec<Product>),
    LoadFailed(String),
    SetSearch(String),
    SetCategory(CategoryFilter),
    SetPriceRange(PriceRange),
    SetStockFilter(StockFilter),
    ResetFilters,
    SetPage(usize),
    SetPageSize(usize),
    ProductCreated(Product),
    ProductUpdated(Product),
    ProductDeleted(ProductId),
    ErrorRaised(String),
    ErrorCleared,
}

/// Compute the state that follows `action`.
///
/// Filter changes always send the user back to page 1; `SetPage` touches
/// nothing but the page.
pub fn reduce(state: &ListState, action: ListAction) -> ListState {
    let mut next = state.clone();
    match action {
        ListAction::LoadStarted => {
            next.loading = true;
        }
        ListAction::ProductsLoaded(products) => {
            next.products = products;
            next.loading = false;
            next.error = None;
        }
        ListAction::LoadFailed(message) => {
            next.loading = false;
            next.error = Some(message);
        }
        ListAction::SetSearch(term) => {
            next.filter.search_term = term;
            next.filter.page = 1;
        }
        ListAction::SetCategory(category) => {
            next.filter.category = category;
            next.filter.page = 1;
        }
        ListAction::SetPriceRange(range) => {
            next.filter.price_range = range;
            next.filter.page = 1;
        }
        ListAction::SetStockFilter(stock) => {
            next.filter.stock = stock;
            next.filter.page = 1;
        }
        ListAction::ResetFilters => {
            next.filter = FilterState::default();
        }
        ListAction::SetPage(page) => {
            next.filter.page = page;
        }
        ListAction::SetPageSize(size) => {
            next.page_size = size.max(1);
            next.filter.page = 1;
        }
        ListAction::ProductCreated(product) => {
            next.products.push(product);
            next.error = None;
        }
        ListAction::ProductUpdated(product) => {
            match next.products.iter_mut().find(|p| p.id == product.id) {
                Some(slot) => *slot = product,
                None => next.products.push(product),
            }
            next.error = None;
        }
        ListAction::ProductDeleted(id) => {
            next.products.retain(|p| p.id != id);
            next.error = None;
        }
        ListAction::ErrorRaised(message) => {
            next.error = Some(message);
        }
        ListAction::ErrorCleared => {
            next.error = None;
        }
    }
    next
}
