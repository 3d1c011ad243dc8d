//! CSV export of product query results.

use crate::{Product, Result};
use std::io::Write;

const HEADER: [&str; 8] = [
    "id",
    "name",
    "category",
    "subcategory",
    "price",
    "discount_price",
    "rating",
    "stock_quantity",
];

/// A row in the CSV output; field order matches `HEADER`
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    subcategory: &'a str,
    price: f64,
    discount_price: Option<f64>,
    rating: f64,
    stock_quantity: u32,
}

impl<'a> From<&'a Product> for CsvRow<'a> {
    fn from(product: &'a Product) -> Self {
        CsvRow {
            id: &product.id,
            name: &product.name,
            category: &product.category,
            subcategory: &product.subcategory,
            price: product.price,
            discount_price: product.discount_price,
            rating: product.rating,
            stock_quantity: product.stock_quantity,
        }
    }
}

/// Write products as CSV (with a header row) to `writer`
///
/// The header is written even when `products` is empty. Returns the number
/// of data rows written.
pub fn write_products_csv<W: Write>(writer: W, products: &[&Product]) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(HEADER)?;

    for product in products {
        writer.serialize(CsvRow::from(*product))?;
    }

    writer.flush()?;
    tracing::debug!("Exported {} products to CSV", products.len());
    Ok(products.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{default_products, query, QuerySpec};

    #[test]
    fn test_csv_has_header_and_rows() {
        let products = query(default_products(), &QuerySpec::new().category("apparel"));
        let mut out = Vec::new();

        let written = write_products_csv(&mut out, &products).unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,name,category,subcategory,price,discount_price,rating,stock_quantity"
        );
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("prod-008,Competition Tank Top,apparel,competition-wear,29.99,24.99"));
    }

    #[test]
    fn test_csv_empty_result_writes_header_only() {
        let mut out = Vec::new();
        assert_eq!(write_products_csv(&mut out, &[]).unwrap(), 0);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "id,name,category,subcategory,price,discount_price,rating,stock_quantity\n"
        );
    }
}
