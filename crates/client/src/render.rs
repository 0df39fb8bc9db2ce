//! Plain-text rendering of the product screen for the terminal.

use std::fmt;

use stockroom_auth::ViewPermissions;
use stockroom_inventory::StockMovement;
use stockroom_products::{Product, ProductListView};

fn stock_badge(product: &Product) -> &'static str {
    if product.is_out_of_stock() {
        "OUT"
    } else if product.is_low_stock() {
        "LOW"
    } else {
        "ok"
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
        out.push('~');
        out
    }
}

/// The product list: error region, table, pager and (for employees) summary.
pub struct ProductScreen<'a> {
    view: &'a ProductListView<'a>,
    permissions: ViewPermissions,
    error: Option<&'a str>,
}

impl<'a> ProductScreen<'a> {
    pub fn new(
        view: &'a ProductListView<'a>,
        permissions: ViewPermissions,
        error: Option<&'a str>,
    ) -> Self {
        Self {
            view,
            permissions,
            error,
        }
    }

    fn render_rows(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.view.rows.is_empty() {
            writeln!(f, "No products found.")?;
            return Ok(());
        }

        writeln!(
            f,
            "{:<8} {:<24} {:<16} {:>10} {:>6} {:<5}",
            "ID", "NAME", "CATEGORY", "PRICE", "QTY", "STOCK"
        )?;
        for p in &self.view.rows {
            writeln!(
                f,
                "{:<8} {:<24} {:<16} {:>10} {:>6} {:<5}",
                truncate(p.id.as_str(), 8),
                truncate(&p.name, 24),
                truncate(&p.category, 16),
                p.price.to_string(),
                p.initial_quantity,
                stock_badge(p)
            )?;
        }
        Ok(())
    }

    fn render_summary(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = &self.view.summary;
        writeln!(f, "\nSummary")?;
        writeln!(f, "  Products:        {}", s.count)?;
        writeln!(f, "  Total value:     {}", s.total_value)?;
        writeln!(f, "  Average price:   {}", s.average_price)?;
        if let Some(p) = s.cheapest {
            writeln!(f, "  Cheapest:        {} ({})", p.name, p.price)?;
        }
        if let Some(p) = s.most_expensive {
            writeln!(f, "  Most expensive:  {} ({})", p.name, p.price)?;
        }
        writeln!(f, "  Low stock:       {}", s.low_stock_count)?;
        writeln!(f, "  Out of stock:    {}", s.out_of_stock_count)?;
        Ok(())
    }
}

impl fmt::Display for ProductScreen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = self.error {
            writeln!(f, "Error: {error}\n")?;
        }
        self.render_rows(f)?;
        if self.view.total_pages > 0 {
            writeln!(
                f,
                "\nPage {} of {} ({} matching)",
                self.view.page,
                self.view.total_pages,
                self.view.filtered.len()
            )?;
        }
        if !self.view.categories.is_empty() {
            writeln!(f, "Categories: {}", self.view.categories.join(", "))?;
        }
        if self.permissions.show_summary {
            self.render_summary(f)?;
        }
        Ok(())
    }
}

/// Stock movement history of one product, newest first as the API returns it.
pub struct HistoryTable<'a> {
    movements: &'a [StockMovement],
}

impl<'a> HistoryTable<'a> {
    pub fn new(movements: &'a [StockMovement]) -> Self {
        Self { movements }
    }
}

impl fmt::Display for HistoryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.movements.is_empty() {
            return writeln!(f, "No stock movements recorded.");
        }
        writeln!(
            f,
            "{:<19} {:<20} {:>6} {:>12} {:<12} REASON",
            "WHEN", "TYPE", "QTY", "STOCK", "USER"
        )?;
        for m in self.movements {
            let when = m
                .timestamp
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<19} {:<20} {:>6} {:>12} {:<12} {}",
                when,
                m.movement_type.description(),
                m.quantity,
                format!("{} -> {}", m.previous_quantity, m.new_quantity),
                m.username.as_deref().unwrap_or("-"),
                m.reason.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}
