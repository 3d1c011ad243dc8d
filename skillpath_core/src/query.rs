//! Product catalog query engine.
//!
//! Turns a product snapshot plus a [`QuerySpec`] into the list shown by the
//! shop. Stateless and total: contradictory bounds yield an empty list.

use crate::{Product, SortKey};

/// Sentinel category/subcategory value that matches every product
pub const ALL: &str = "all";

/// Filter and sort parameters for [`query`]
///
/// Every field defaults to its neutral value, so `QuerySpec::default()`
/// returns the snapshot unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct QuerySpec {
    /// Case-insensitive substring matched against name or description
    pub search_text: String,
    pub category: String,
    pub subcategory: String,
    pub min_price: f64,
    pub max_price: f64,
    pub sort: SortKey,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: ALL.into(),
            subcategory: ALL.into(),
            min_price: 0.0,
            max_price: f64::INFINITY,
            sort: SortKey::Featured,
        }
    }
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    /// Inclusive list-price bounds
    pub fn price_range(mut self, min: f64, max: f64) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Whether a single product passes every filter
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && matches_sentinel(&self.category, &product.category)
            && matches_sentinel(&self.subcategory, &product.subcategory)
            // List price, not discount price
            && self.min_price <= product.price
            && product.price <= self.max_price
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle)
    }
}

fn matches_sentinel(wanted: &str, actual: &str) -> bool {
    wanted == ALL || wanted == actual
}

/// Filter and sort a product snapshot
///
/// Sorting is stable, so ties keep input order.
pub fn query<'a>(products: &'a [Product], spec: &QuerySpec) -> Vec<&'a Product> {
    let mut results: Vec<&Product> = products.iter().filter(|p| spec.matches(p)).collect();

    match spec.sort {
        SortKey::Featured => {}
        SortKey::PriceLow => results.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHigh => results.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortKey::Rating => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        // Ids are not guaranteed chronological; kept as the newness proxy
        SortKey::Newest => results.sort_by(|a, b| b.id.cmp(&a.id)),
    }

    tracing::debug!(
        "Query matched {} of {} products (sort: {})",
        results.len(),
        products.len(),
        spec.sort
    );
    results
}

/// Look up a product by id
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

/// Products rated at least `min_rating`, in input order
pub fn featured_products(products: &[Product], min_rating: f64) -> Vec<&Product> {
    products.iter().filter(|p| p.rating >= min_rating).collect()
}

pub fn products_in_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| p.category == category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_products, ProductStatus};

    fn product(id: &str, price: f64, category: &str) -> Product {
        Product {
            id: id.into(),
            name: format!("Item {}", id),
            description: String::new(),
            long_description: String::new(),
            category: category.into(),
            subcategory: String::new(),
            price,
            discount_price: None,
            currency: "USD".into(),
            rating: 0.0,
            review_count: 0,
            stock_quantity: 0,
            images: vec![],
            features: vec![],
            tags: vec![],
            status: ProductStatus::Active,
            assets_3d: None,
            specifications: None,
        }
    }

    fn two_products() -> Vec<Product> {
        vec![product("p1", 10.0, "resistance"), product("p2", 50.0, "cardio")]
    }

    fn ids<'a>(results: &[&'a Product]) -> Vec<&'a str> {
        results.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_category_filter() {
        let products = two_products();
        let results = query(&products, &QuerySpec::new().category("resistance"));
        assert_eq!(ids(&results), vec!["p1"]);
    }

    #[test]
    fn test_price_range_excludes_both() {
        let products = two_products();
        let results = query(&products, &QuerySpec::new().price_range(20.0, 40.0));
        assert!(results.is_empty());
    }

    #[test]
    fn test_price_bounds_inclusive() {
        let products = two_products();
        let results = query(&products, &QuerySpec::new().price_range(10.0, 50.0));
        assert_eq!(ids(&results), vec!["p1", "p2"]);
    }

    #[test]
    fn test_inverted_range_is_empty_not_error() {
        let products = two_products();
        assert!(query(&products, &QuerySpec::new().price_range(60.0, 5.0)).is_empty());
    }

    #[test]
    fn test_price_filter_uses_list_price() {
        let mut products = two_products();
        products[1].discount_price = Some(30.0);
        let results = query(&products, &QuerySpec::new().price_range(20.0, 40.0));
        assert!(results.is_empty());
    }

    #[test]
    fn test_identity_filter_returns_everything_in_order() {
        let products = default_products();
        let results = query(products, &QuerySpec::default());
        assert_eq!(results.len(), products.len());
        for (result, original) in results.iter().zip(products) {
            assert_eq!(result.id, original.id);
        }
    }

    #[test]
    fn test_identity_filter_with_sort_is_permutation() {
        let products = default_products();
        for sort in SortKey::ALL {
            let mut got = ids(&query(products, &QuerySpec::new().sort(sort)));
            let mut want: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
            got.sort_unstable();
            want.sort_unstable();
            assert_eq!(got, want, "sort {} dropped or duplicated products", sort);
        }
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_or_description() {
        let products = default_products();
        // Matches the rings by name and the chalk by description
        let by_name = query(products, &QuerySpec::new().search("RINGS"));
        assert_eq!(ids(&by_name), vec!["prod-003", "prod-006"]);

        let by_description = query(products, &QuerySpec::new().search("handstand"));
        assert_eq!(ids(&by_description), vec!["prod-010"]);

        assert!(query(products, &QuerySpec::new().search("kettlebell")).is_empty());
    }

    #[test]
    fn test_subcategory_filter() {
        let products = default_products();
        let results = query(products, &QuerySpec::new().subcategory("weighted-training"));
        assert_eq!(ids(&results), vec!["prod-004", "prod-005"]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let products = default_products();
        let spec = QuerySpec::new()
            .category("apparel")
            .search("tank")
            .price_range(0.0, 30.0);
        assert_eq!(ids(&query(products, &spec)), vec!["prod-008"]);
    }

    #[test]
    fn test_tightening_never_grows_results() {
        let products = default_products();
        let base = QuerySpec::new();
        let narrower = [
            base.clone().search("premium"),
            base.clone().category("equipment"),
            base.clone().subcategory("parallettes"),
            base.clone().price_range(20.0, 100.0),
            base.clone().price_range(20.0, 100.0).search("vest"),
        ];
        let base_len = query(products, &base).len();
        for spec in &narrower {
            let len = query(products, spec).len();
            assert!(len <= base_len, "{:?} grew results", spec);
        }

        let wide = query(products, &base.clone().price_range(0.0, 200.0)).len();
        let tight = query(products, &base.price_range(30.0, 60.0)).len();
        assert!(tight <= wide);
    }

    #[test]
    fn test_sort_price_low_non_decreasing() {
        let results = query(default_products(), &QuerySpec::new().sort(SortKey::PriceLow));
        assert!(results.windows(2).all(|w| w[0].price <= w[1].price));
    }

    #[test]
    fn test_sort_price_high_non_increasing() {
        let results = query(default_products(), &QuerySpec::new().sort(SortKey::PriceHigh));
        assert!(results.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_sort_rating_non_increasing() {
        let results = query(default_products(), &QuerySpec::new().sort(SortKey::Rating));
        assert!(results.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let products = vec![
            product("b", 10.0, "x"),
            product("a", 10.0, "x"),
            product("c", 5.0, "x"),
        ];
        let low = query(&products, &QuerySpec::new().sort(SortKey::PriceLow));
        assert_eq!(ids(&low), vec!["c", "b", "a"]);

        let high = query(&products, &QuerySpec::new().sort(SortKey::PriceHigh));
        assert_eq!(ids(&high), vec!["b", "a", "c"]);

        let rating = query(&products, &QuerySpec::new().sort(SortKey::Rating));
        assert_eq!(ids(&rating), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_newest_by_descending_id() {
        let products = vec![
            product("p1", 1.0, "x"),
            product("p3", 1.0, "x"),
            product("p10", 1.0, "x"),
            product("p2", 1.0, "x"),
        ];
        let results = query(&products, &QuerySpec::new().sort(SortKey::Newest));
        // Lexicographic: "p10" sorts before "p2"
        assert_eq!(ids(&results), vec!["p3", "p2", "p10", "p1"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceLow);
        assert_eq!("Rating".parse::<SortKey>().unwrap(), SortKey::Rating);
        assert!(matches!(
            "cheapest".parse::<SortKey>(),
            Err(crate::Error::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_find_product() {
        let products = two_products();
        assert_eq!(find_product(&products, "p2").map(|p| p.price), Some(50.0));
        assert!(find_product(&products, "p9").is_none());
    }

    #[test]
    fn test_featured_products() {
        let featured = featured_products(default_products(), 4.0);
        assert_eq!(featured.len(), 9);
        assert!(featured.iter().all(|p| p.rating >= 4.0));
        assert!(featured.iter().all(|p| p.id != "prod-008"));
    }

    #[test]
    fn test_products_in_category() {
        let apparel = products_in_category(default_products(), "apparel");
        assert_eq!(ids(&apparel), vec!["prod-007", "prod-008", "prod-009"]);
        assert!(products_in_category(default_products(), "supplements").is_empty());
    }
}
