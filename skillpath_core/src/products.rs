//! Product snapshots and the sources that provide them.
//!
//! The shop backend is an external collaborator exposing "list products" and
//! "get product by id". Here it is modeled by the [`ProductSource`] trait with
//! a JSON snapshot implementation and an in-memory one. Snapshots are
//! validated once at load time so the query engine can stay total.

use crate::{Error, Product, Product3dAsset, ProductSpecs, ProductStatus, Result};
use fs2::FileExt;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Provider of product snapshots
pub trait ProductSource {
    /// All products, in source order
    fn list_products(&self) -> Result<Vec<Product>>;

    /// A single product, or `None` when the id is unknown
    fn get_product(&self, id: &str) -> Result<Option<Product>>;
}

/// Product source backed by a JSON array file
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductSource for JsonFileSource {
    fn list_products(&self) -> Result<Vec<Product>> {
        let contents = read_locked(&self.path)?;
        let products = parse_products(&contents)?;
        tracing::info!("Loaded {} products from {:?}", products.len(), self.path);
        Ok(products)
    }

    fn get_product(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.list_products()?.into_iter().find(|p| p.id == id))
    }
}

/// Product source over an already-validated list
#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    products: Vec<Product>,
}

impl InMemorySource {
    /// Wrap a product list, validating it first
    pub fn new(products: Vec<Product>) -> Result<Self> {
        validate_products(&products)?;
        Ok(Self { products })
    }

    /// Source over the built-in shop fixture
    pub fn with_defaults() -> Self {
        Self {
            products: default_products().to_vec(),
        }
    }
}

impl ProductSource for InMemorySource {
    fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn get_product(&self, id: &str) -> Result<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

/// Parse a JSON array of products and validate it
pub fn parse_products(json: &str) -> Result<Vec<Product>> {
    let products: Vec<Product> = serde_json::from_str(json)?;
    validate_products(&products)?;
    Ok(products)
}

/// Reject a snapshot that breaks product invariants
///
/// Fails on the first problem: empty id or name, duplicate id, non-finite or
/// negative price, discount not below price, rating outside 0..=5.
pub fn validate_products(products: &[Product]) -> Result<()> {
    let mut seen = HashSet::new();

    for product in products {
        if product.id.is_empty() {
            return Err(Error::ProductValidation("Product has empty ID".into()));
        }
        if !seen.insert(product.id.as_str()) {
            return Err(Error::ProductValidation(format!(
                "Duplicate product id '{}'",
                product.id
            )));
        }
        if product.name.is_empty() {
            return Err(Error::ProductValidation(format!(
                "Product '{}' has empty name",
                product.id
            )));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(Error::ProductValidation(format!(
                "Product '{}' has invalid price {}",
                product.id, product.price
            )));
        }
        if let Some(discount) = product.discount_price {
            if !discount.is_finite() || discount < 0.0 || discount >= product.price {
                return Err(Error::ProductValidation(format!(
                    "Product '{}': discount price {} must be below price {}",
                    product.id, discount, product.price
                )));
            }
        }
        if !(0.0..=5.0).contains(&product.rating) {
            return Err(Error::ProductValidation(format!(
                "Product '{}': rating {} outside 0-5",
                product.id, product.rating
            )));
        }
    }

    Ok(())
}

impl Product {
    /// Price the customer actually pays
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whole-percent discount off list price, if discounted
    pub fn discount_percent(&self) -> Option<u32> {
        let discount = self.discount_price?;
        if self.price <= 0.0 {
            return None;
        }
        Some((((self.price - discount) / self.price) * 100.0).round() as u32)
    }

    pub fn in_stock(&self) -> bool {
        self.status == ProductStatus::Active && self.stock_quantity > 0
    }
}

/// Read a whole file while holding a shared lock
pub(crate) fn read_locked(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(contents)
}

/// Atomically write `contents` to `path`
///
/// Writes to a temp file in the same directory under an exclusive lock,
/// syncs it, then renames it over the target.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        writer.write_all(contents)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Save a product snapshot as a pretty-printed JSON array
pub fn save_products(path: &Path, products: &[Product]) -> Result<()> {
    validate_products(products)?;
    let contents = serde_json::to_string_pretty(products)?;
    write_atomic(path, contents.as_bytes())?;
    tracing::info!("Saved {} products to {:?}", products.len(), path);
    Ok(())
}

/// Cached shop fixture - built once and reused
static DEFAULT_PRODUCTS: Lazy<Vec<Product>> = Lazy::new(build_default_products);

/// Built-in product catalog used when no snapshot file exists
pub fn default_products() -> &'static [Product] {
    &DEFAULT_PRODUCTS
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    subcategory: &str,
    price: f64,
    discount_price: Option<f64>,
    rating: f64,
    review_count: u32,
    stock_quantity: u32,
) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        long_description: String::new(),
        category: category.into(),
        subcategory: subcategory.into(),
        price,
        discount_price,
        currency: "USD".into(),
        rating,
        review_count,
        stock_quantity,
        images: vec![format!("https://images.skillpath.example/{}.jpg", id)],
        features: vec![],
        tags: vec![],
        status: ProductStatus::Active,
        assets_3d: Some(Product3dAsset {
            model_url: format!("https://assets.skillpath.example/{}.glb", id),
            texture_urls: vec![],
            preview_image: format!("https://images.skillpath.example/{}-3d.jpg", id),
        }),
        specifications: None,
    }
}

fn build_default_products() -> Vec<Product> {
    let mut products = vec![
        product(
            "prod-001",
            "Premium Resistance Bands Set",
            "Five latex bands for assisted pull-ups and mobility work",
            "equipment",
            "resistance-systems",
            49.99,
            Some(39.99),
            4.8,
            214,
            120,
        ),
        product(
            "prod-002",
            "Premium Parallettes Set",
            "Low wooden parallettes for L-sits, planche and push-up progressions",
            "equipment",
            "parallettes",
            89.99,
            None,
            4.9,
            156,
            45,
        ),
        product(
            "prod-003",
            "Professional Workout Rings",
            "Birch gymnastic rings with numbered straps",
            "equipment",
            "suspension-training",
            69.99,
            Some(59.99),
            4.7,
            301,
            80,
        ),
        product(
            "prod-004",
            "Elite Weight Vest (10kg)",
            "Adjustable vest for weighted pull-ups and dips",
            "equipment",
            "weighted-training",
            129.99,
            None,
            4.6,
            88,
            25,
        ),
        product(
            "prod-005",
            "Elite Weight Vest (20kg)",
            "Heavy adjustable vest for advanced weighted calisthenics",
            "equipment",
            "weighted-training",
            179.99,
            Some(159.99),
            4.5,
            41,
            0,
        ),
        product(
            "prod-006",
            "Premium Liquid Chalk",
            "Fast-drying chalk for a secure grip on bars and rings",
            "accessories",
            "grip-enhancement",
            14.99,
            None,
            4.4,
            512,
            300,
        ),
        product(
            "prod-007",
            "Performance Training T-Shirt",
            "Breathable shirt cut for full shoulder range of motion",
            "apparel",
            "performance-wear",
            34.99,
            None,
            4.2,
            97,
            150,
        ),
        product(
            "prod-008",
            "Competition Tank Top",
            "Lightweight tank for street workout competitions",
            "apparel",
            "competition-wear",
            29.99,
            Some(24.99),
            3.9,
            36,
            60,
        ),
        product(
            "prod-009",
            "Premium Training Hoodie",
            "Heavyweight hoodie for outdoor park sessions",
            "apparel",
            "lifestyle-wear",
            59.99,
            None,
            4.3,
            73,
            40,
        ),
        product(
            "prod-010",
            "Wrist Support Wraps",
            "Elastic wraps that stabilize the wrist during handstand work",
            "accessories",
            "support-systems",
            19.99,
            None,
            4.1,
            128,
            200,
        ),
    ];

    products[4].status = ProductStatus::OutOfStock;
    products[1].specifications = Some(ProductSpecs {
        dimensions: Some("35cm x 20cm x 15cm".into()),
        weight: Some("2.1kg".into()),
        material: Some("Beech wood".into()),
        color_options: vec!["natural".into(), "black".into()],
    });
    products
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(id: &str, price: f64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {}", id),
            description: String::new(),
            long_description: String::new(),
            category: "equipment".into(),
            subcategory: String::new(),
            price,
            discount_price: None,
            currency: "USD".into(),
            rating: 0.0,
            review_count: 0,
            stock_quantity: 1,
            images: vec![],
            features: vec![],
            tags: vec![],
            status: ProductStatus::Active,
            assets_3d: None,
            specifications: None,
        }
    }

    #[test]
    fn test_default_products_validate() {
        assert!(validate_products(default_products()).is_ok());
        assert_eq!(default_products().len(), 10);
    }

    #[test]
    fn test_discount_must_be_below_price() {
        let mut p = minimal("p1", 10.0);
        p.discount_price = Some(10.0);
        assert!(matches!(
            validate_products(&[p]),
            Err(Error::ProductValidation(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = validate_products(&[minimal("p1", 1.0), minimal("p1", 2.0)]);
        assert!(matches!(result, Err(Error::ProductValidation(msg)) if msg.contains("Duplicate")));
    }

    #[test]
    fn test_negative_and_nan_prices_rejected() {
        assert!(validate_products(&[minimal("p1", -1.0)]).is_err());
        assert!(validate_products(&[minimal("p1", f64::NAN)]).is_err());
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let mut p = minimal("p1", 5.0);
        p.rating = 5.5;
        assert!(validate_products(&[p]).is_err());
    }

    #[test]
    fn test_parse_accepts_minimal_and_camel_case() {
        let json = r#"[
            {"id": "p1", "name": "Bands", "description": "d", "category": "resistance", "price": 10},
            {"id": "p2", "name": "Rings", "description": "d", "category": "cardio", "price": 50,
             "discountPrice": 45, "stockQuantity": 3, "rating": 4.5}
        ]"#;
        let products = parse_products(json).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].currency, "USD");
        assert_eq!(products[0].subcategory, "");
        assert_eq!(products[1].discount_price, Some(45.0));
        assert_eq!(products[1].stock_quantity, 3);
    }

    #[test]
    fn test_parse_rejects_missing_price() {
        let json = r#"[{"id": "p1", "name": "Bands", "description": "d", "category": "x"}]"#;
        assert!(matches!(parse_products(json), Err(Error::Json(_))));
    }

    #[test]
    fn test_effective_price_and_discount() {
        let mut p = minimal("p1", 50.0);
        assert_eq!(p.effective_price(), 50.0);
        assert_eq!(p.discount_percent(), None);

        p.discount_price = Some(40.0);
        assert_eq!(p.effective_price(), 40.0);
        assert_eq!(p.discount_percent(), Some(20));
    }

    #[test]
    fn test_in_stock() {
        let mut p = minimal("p1", 5.0);
        assert!(p.in_stock());
        p.stock_quantity = 0;
        assert!(!p.in_stock());
        p.stock_quantity = 5;
        p.status = ProductStatus::Inactive;
        assert!(!p.in_stock());
    }

    #[test]
    fn test_json_file_source_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("products.json");

        save_products(&path, default_products()).unwrap();

        let source = JsonFileSource::new(&path);
        let products = source.list_products().unwrap();
        assert_eq!(products.len(), default_products().len());

        let rings = source.get_product("prod-003").unwrap().unwrap();
        assert_eq!(rings.name, "Professional Workout Rings");
        assert!(source.get_product("missing").unwrap().is_none());
    }

    #[test]
    fn test_json_file_source_missing_file_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(temp_dir.path().join("nope.json"));
        assert!(matches!(source.list_products(), Err(Error::Io(_))));
    }

    #[test]
    fn test_json_file_source_fails_fast_on_invalid_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"id": "p1", "name": "x", "description": "", "category": "c", "price": 10, "discount_price": 12}]"#,
        )
        .unwrap();

        let result = JsonFileSource::new(&path).list_products();
        assert!(matches!(result, Err(Error::ProductValidation(_))));
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new(vec![minimal("a", 1.0), minimal("b", 2.0)]).unwrap();
        assert_eq!(source.list_products().unwrap().len(), 2);
        assert_eq!(source.get_product("b").unwrap().map(|p| p.price), Some(2.0));

        assert!(InMemorySource::new(vec![minimal("a", 1.0), minimal("a", 1.0)]).is_err());
        assert_eq!(InMemorySource::with_defaults().list_products().unwrap().len(), 10);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("products.json");
        save_products(&path, &[minimal("a", 1.0)]).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "products.json")
            .collect();
        assert!(extras.is_empty(), "found extras: {:?}", extras);
    }
}
