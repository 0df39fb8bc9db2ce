//! Product list view model.
//!
//! A pure transformation from the cached product collection plus the current
//! [`FilterState`] into exactly what the display layer renders: the visible page
//! of rows, the page count, summary statistics and the category dropdown.

use serde::Serialize;

use stockroom_core::{Money, Price};

use crate::filter::FilterState;
use crate::product::Product;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Rendered state of the product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView<'a> {
    /// Every product passing the filters, in collection order.
    pub filtered: Vec<&'a Product>,
    /// The requested page of `filtered`. Empty when the page is out of range.
    pub rows: Vec<&'a Product>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub summary: SummaryStats<'a>,
    /// Distinct categories of the unfiltered collection, first-seen order.
    pub categories: Vec<&'a str>,
}

/// Statistics over the filtered products.
///
/// `low_stock_count` and `out_of_stock_count` are catalog-wide health
/// indicators and are computed over the unfiltered collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats<'a> {
    pub count: usize,
    pub total_value: Money,
    pub average_price: Price,
    pub cheapest: Option<&'a Product>,
    pub most_expensive: Option<&'a Product>,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

/// Build the view for `products` under `filter`.
///
/// A `page_size` of 0 is treated as 1.
pub fn build_view<'a>(
    products: &'a [Product],
    filter: &FilterState,
    page_size: usize,
) -> ProductListView<'a> {
    let page_size = page_size.max(1);
    let filtered: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    let rows = page_of(&filtered, filter.page, page_size).to_vec();
    let total_pages = filtered.len().div_ceil(page_size);
    let summary = summarize(products, &filtered);

    ProductListView {
        rows,
        page: filter.page,
        page_size,
        total_pages,
        summary,
        categories: distinct_categories(products),
        filtered,
    }
}

/// Slice out 1-based `page`. Page 0 and pages past the end are empty.
fn page_of<'s, T>(items: &'s [T], page: usize, page_size: usize) -> &'s [T] {
    let Some(index) = page.checked_sub(1) else {
        return &[];
    };
    let start = index.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

fn summarize<'a>(all: &'a [Product], filtered: &[&'a Product]) -> SummaryStats<'a> {
    let count = filtered.len();
    let total_value: Money = filtered.iter().map(|p| p.stock_value()).sum();

    let price_sum: u128 = filtered.iter().map(|p| u128::from(p.price.cents())).sum();
    let denominator = count.max(1) as u128;
    // Round half up to the nearest cent.
    let average_cents = (price_sum + denominator / 2) / denominator;
    let average_price = Price::from_cents(u64::try_from(average_cents).unwrap_or(u64::MAX));

    let mut cheapest: Option<&Product> = None;
    let mut most_expensive: Option<&Product> = None;
    for &product in filtered {
        if cheapest.is_none_or(|c| product.price < c.price) {
            cheapest = Some(product);
        }
        if most_expensive.is_none_or(|m| product.price > m.price) {
            most_expensive = Some(product);
        }
    }

    SummaryStats {
        count,
        total_value,
        average_price,
        cheapest,
        most_expensive,
        low_stock_count: all.iter().filter(|p| p.is_low_stock()).count(),
        out_of_stock_count: all.iter().filter(|p| p.is_out_of_stock()).count(),
    }
}

/// Options for the category dropdown.
pub fn distinct_categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(product.category.as_str());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{CategoryFilter, PriceRange, StockFilter};
    use stockroom_core::ProductId;

    fn product(id: u64, name: &str, category: &str, cents: u64, qty: u32) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: format!("{name} item"),
            category: category.to_string(),
            price: Price::from_cents(cents),
            initial_quantity: qty,
            minimum_stock: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Laptop", "Electronics", 99_999, 12),
            product(2, "Mouse", "Peripherals", 1_999, 4),
            product(3, "Monitor", "Electronics", 24_950, 0),
            product(4, "Keyboard", "Peripherals", 1_999, 30),
            product(5, "Desk", "Furniture", 15_000, 2),
        ]
    }

    #[test]
    fn out_of_stock_scenario_has_zero_value() {
        let products = vec![product(1, "a", "c", 1_000, 5), product(2, "b", "c", 2_000, 0)];
        let filter = FilterState {
            stock: StockFilter::Out,
            ..FilterState::default()
        };

        let view = build_view(&products, &filter, DEFAULT_PAGE_SIZE);
        assert_eq!(view.filtered, vec![&products[1]]);
        assert_eq!(view.summary.total_value, Money::ZERO);
    }

    #[test]
    fn search_scenario_keeps_only_matching_names() {
        let products = vec![
            product(1, "Laptop", "Computers", 100, 1),
            product(2, "Mouse", "Accessories", 100, 1),
        ];
        let filter = FilterState {
            search_term: "lap".to_string(),
            ..FilterState::default()
        };

        let view = build_view(&products, &filter, DEFAULT_PAGE_SIZE);
        let names: Vec<&str> = view.filtered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop"]);
    }

    #[test]
    fn empty_collection_yields_zero_everything() {
        let view = build_view(&[], &FilterState::default(), DEFAULT_PAGE_SIZE);
        assert!(view.filtered.is_empty());
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.summary, SummaryStats::default());
        assert!(view.categories.is_empty());
    }

    #[test]
    fn pages_slice_the_filtered_list() {
        let products = catalog();
        let mut filter = FilterState::default();

        let view = build_view(&products, &filter, 2);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.rows, vec![&products[0], &products[1]]);

        filter.page = 3;
        let view = build_view(&products, &filter, 2);
        assert_eq!(view.rows, vec![&products[4]]);

        filter.page = 4;
        let view = build_view(&products, &filter, 2);
        assert!(view.rows.is_empty());
        assert_eq!(view.filtered.len(), 5);

        filter.page = 0;
        assert!(build_view(&products, &filter, 2).rows.is_empty());
    }

    #[test]
    fn summary_covers_filtered_set_and_health_covers_catalog() {
        let products = catalog();
        let filter = FilterState {
            category: CategoryFilter::from("Peripherals"),
            ..FilterState::default()
        };

        let view = build_view(&products, &filter, DEFAULT_PAGE_SIZE);
        let s = &view.summary;
        assert_eq!(s.count, 2);
        assert_eq!(s.total_value, Money::from_cents(1_999 * 4 + 1_999 * 30));
        assert_eq!(s.average_price, Price::from_cents(1_999));
        // Equal prices: first occurrence wins on both ends.
        assert_eq!(s.cheapest.map(|p| p.name.as_str()), Some("Mouse"));
        assert_eq!(s.most_expensive.map(|p| p.name.as_str()), Some("Mouse"));
        // Catalog-wide: Mouse, Monitor, Desk are low; Monitor is out.
        assert_eq!(s.low_stock_count, 3);
        assert_eq!(s.out_of_stock_count, 1);
    }

    #[test]
    fn average_price_rounds_to_cents() {
        let products = vec![product(1, "a", "c", 1, 1), product(2, "b", "c", 2, 1)];
        let view = build_view(&products, &FilterState::default(), DEFAULT_PAGE_SIZE);
        // 1.5 cents rounds up.
        assert_eq!(view.summary.average_price, Price::from_cents(2));
    }

    #[test]
    fn price_range_and_category_combine() {
        let products = catalog();
        let filter = FilterState {
            category: CategoryFilter::from("Electronics"),
            price_range: PriceRange::new(Price::from_cents(10_000), Price::from_cents(50_000)),
            ..FilterState::default()
        };

        let view = build_view(&products, &filter, DEFAULT_PAGE_SIZE);
        let names: Vec<&str> = view.filtered.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Monitor"]);
        assert_eq!(
            view.summary.cheapest.map(|p| p.id.clone()),
            Some(ProductId::from(3))
        );
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        let products = catalog();
        assert_eq!(
            distinct_categories(&products),
            vec!["Electronics", "Peripherals", "Furniture"]
        );
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let products = catalog();
        let view = build_view(&products, &FilterState::default(), 0);
        assert_eq!(view.page_size, 1);
        assert_eq!(view.total_pages, 5);
        assert_eq!(view.rows.len(), 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_product() -> impl Strategy<Value = Product> {
            (
                1u64..1_000,
                "[A-Za-z]{1,8}",
                "[a-c]{1,2}",
                0u64..5_000,
                0u32..20,
            )
                .prop_map(|(id, name, category, cents, qty)| product(id, &name, &category, cents, qty))
        }

        fn arb_filter() -> impl Strategy<Value = FilterState> {
            (
                prop_oneof![Just(String::new()), "[a-zA-Z]{1,2}"],
                prop_oneof![Just("all".to_string()), "[a-c]{1,2}"],
                0u64..5_000,
                proptest::option::of(0u64..5_000),
                prop_oneof![
                    Just(StockFilter::All),
                    Just(StockFilter::Low),
                    Just(StockFilter::Out),
                    Just(StockFilter::In),
                ],
                1usize..6,
            )
                .prop_map(|(search_term, category, min, max, stock, page)| FilterState {
                    search_term,
                    category: CategoryFilter::from(category.as_str()),
                    price_range: PriceRange {
                        min: Price::from_cents(min),
                        max: max.map(Price::from_cents),
                    },
                    stock,
                    page,
                })
        }

        /// Reference predicate written out independently of `FilterState::matches`.
        fn passes(p: &Product, f: &FilterState) -> bool {
            let needle = f.search_term.to_lowercase();
            let search = f.search_term.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.category.to_lowercase().contains(&needle);
            let category = match &f.category {
                CategoryFilter::All => true,
                CategoryFilter::Only(c) => &p.category == c,
            };
            let price = f.price_range.min <= p.price
                && f.price_range.max.map_or(true, |max| p.price <= max);
            let stock = match f.stock {
                StockFilter::All => true,
                StockFilter::Low => p.initial_quantity < 10,
                StockFilter::Out => p.initial_quantity == 0,
                StockFilter::In => p.initial_quantity > 0,
            };
            search && category && price && stock
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: filtering is sound and complete, and preserves order.
            #[test]
            fn filtered_is_exactly_the_passing_subsequence(
                products in proptest::collection::vec(arb_product(), 0..40),
                filter in arb_filter(),
            ) {
                let view = build_view(&products, &filter, DEFAULT_PAGE_SIZE);
                let expected: Vec<&Product> = products.iter().filter(|p| passes(p, &filter)).collect();
                prop_assert_eq!(view.filtered, expected);
            }

            /// Property: page count and first page follow the filtered length.
            #[test]
            fn paging_follows_filtered_length(
                products in proptest::collection::vec(arb_product(), 0..40),
                filter in arb_filter(),
                page_size in 1usize..8,
            ) {
                let first = FilterState { page: 1, ..filter };
                let view = build_view(&products, &first, page_size);
                let n = view.filtered.len();
                prop_assert_eq!(view.total_pages, (n + page_size - 1) / page_size);
                prop_assert_eq!(view.rows.len(), n.min(page_size));
                prop_assert_eq!(&view.rows[..], &view.filtered[..view.rows.len()]);
            }

            /// Property: total value is the exact sum over the filtered set.
            #[test]
            fn total_value_is_exact(
                products in proptest::collection::vec(arb_product(), 0..40),
                filter in arb_filter(),
            ) {
                let view = build_view(&products, &filter, DEFAULT_PAGE_SIZE);
                let expected: u64 = view
                    .filtered
                    .iter()
                    .map(|p| p.price.cents() * u64::from(p.initial_quantity))
                    .sum();
                prop_assert_eq!(view.summary.total_value, Money::from_cents(expected));
                prop_assert_eq!(view.summary.count, view.filtered.len());
            }
        }
    }
}
