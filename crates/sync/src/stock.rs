//! Stock reconciliation.
//!
//! Sets absolute stock quantities for existing, stock-managed products by
//! SKU match against the feed. This side never creates products - that is
//! the importer's job - and never enables stock management as a side
//! effect; a product without it counts as an error and is left alone.

use tracing::instrument;

use superball_core::Sku;

use crate::catalog::ProductCatalog;
use crate::diag::DiagnosticLog;
use crate::feed::{Column, FeedError, FeedRow, ParsedFeed};

/// Columns a stock run cannot do without.
const REQUIRED_COLUMNS: &[Column] = &[Column::Sku, Column::Stock];

/// Aggregate result of one stock run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockSummary {
    /// Products whose quantity was set this run.
    pub updated: u32,
    /// Rows that could not be applied.
    pub errors: u32,
}

/// Applies feed stock levels to the catalog.
pub struct StockReconciler<'a> {
    catalog: &'a dyn ProductCatalog,
    diag: DiagnosticLog,
}

impl<'a> StockReconciler<'a> {
    pub fn new(catalog: &'a dyn ProductCatalog, diag: DiagnosticLog) -> Self {
        Self { catalog, diag }
    }

    /// Reconcile every row of the feed.
    ///
    /// # Errors
    ///
    /// [`FeedError::Schema`] when the `sku` or `stock` column is missing;
    /// the run aborts before touching any row. Row-level problems are
    /// counted in the summary instead.
    #[instrument(skip_all)]
    pub fn reconcile(&self, feed: &ParsedFeed) -> Result<StockSummary, FeedError> {
        feed.require_columns(REQUIRED_COLUMNS).inspect_err(|e| {
            self.diag.log(format!("Stock update aborted: {e}"));
        })?;

        self.diag.log("Starting stock update from feed.");
        let mut summary = StockSummary::default();

        for row in feed.rows() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    self.diag.log(format!("{e}. Skipping."));
                    summary.errors += 1;
                    continue;
                }
            };
            match self.reconcile_row(&row) {
                Ok(()) => summary.updated += 1,
                Err(message) => {
                    self.diag
                        .log(format!("Row at line {}: {message}. Skipping.", row.line()));
                    summary.errors += 1;
                }
            }
        }

        self.diag.log(format!(
            "Stock update finished. Updated: {}, Errors: {}.",
            summary.updated, summary.errors
        ));
        Ok(summary)
    }

    fn reconcile_row(&self, row: &FeedRow<'_>) -> Result<(), String> {
        let sku = Sku::new(row.get(Column::Sku).unwrap_or_default());
        if sku.is_empty() {
            return Err("empty SKU".to_string());
        }

        let quantity = parse_stock(row.get(Column::Stock).unwrap_or_default());

        let product_id = self
            .catalog
            .product_id_by_sku(&sku)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("product with SKU '{sku}' not found"))?;

        let product = self
            .catalog
            .product(product_id)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("product ID {product_id} vanished during the run"))?;

        if !product.manage_stock {
            return Err(format!(
                "product ID {product_id} (SKU: {sku}) does not have stock management enabled"
            ));
        }

        self.catalog
            .set_stock_quantity(product_id, quantity)
            .map_err(|e| e.to_string())?;
        self.diag.log(format!(
            "Updated stock for product ID {product_id} (SKU: {sku}) to {quantity}."
        ));
        Ok(())
    }
}

/// Integer coercion of a feed stock cell: `"7"` is 7, `"7.9"` truncates
/// to 7, anything non-numeric is 0.
fn parse_stock(raw: &str) -> i64 {
    let raw = raw.trim();
    raw.parse::<i64>().unwrap_or_else(|_| {
        raw.parse::<f64>()
            .map(|f| f.trunc() as i64)
            .unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCatalog, test_product};

    fn parse(text: &str) -> ParsedFeed {
        ParsedFeed::parse(text).unwrap()
    }

    fn reconciler(catalog: &InMemoryCatalog) -> StockReconciler<'_> {
        StockReconciler::new(catalog, DiagnosticLog::disabled())
    }

    #[test]
    fn sets_absolute_quantity_for_managed_products() {
        let catalog = InMemoryCatalog::default();
        let id = catalog.insert(test_product("SB-1", Some("superball")));
        catalog.set_quantity_raw(id, 40);

        let summary = reconciler(&catalog)
            .reconcile(&parse("sku,stock\nSB-1,7\n"))
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.errors, 0);
        // Absolute set, not a delta on the previous 40.
        assert_eq!(catalog.product(id).unwrap().unwrap().stock_quantity, 7);
    }

    #[test]
    fn unmanaged_product_is_an_error_and_left_unchanged() {
        let catalog = InMemoryCatalog::default();
        let mut product = test_product("SB-1", Some("superball"));
        product.manage_stock = false;
        product.stock_quantity = 3;
        let id = catalog.insert(product);

        let summary = reconciler(&catalog)
            .reconcile(&parse("sku,stock\nSB-1,7\n"))
            .unwrap();
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.errors, 1);
        assert_eq!(catalog.product(id).unwrap().unwrap().stock_quantity, 3);
        assert!(!catalog.product(id).unwrap().unwrap().manage_stock);
    }

    #[test]
    fn unknown_sku_is_an_error_and_never_creates_a_product() {
        let catalog = InMemoryCatalog::default();
        let summary = reconciler(&catalog)
            .reconcile(&parse("sku,stock\nGHOST,5\n"))
            .unwrap();
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.errors, 1);
        assert_eq!(catalog.product_count(), 0);
    }

    #[test]
    fn empty_sku_and_short_rows_are_errors() {
        let catalog = InMemoryCatalog::default();
        catalog.insert(test_product("SB-1", Some("superball")));

        let summary = reconciler(&catalog)
            .reconcile(&parse("sku,stock\n  ,5\nSB-1\nSB-1,9\n"))
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.errors, 2);
    }

    #[test]
    fn missing_required_columns_abort_the_run() {
        let catalog = InMemoryCatalog::default();
        let err = reconciler(&catalog)
            .reconcile(&parse("sku,name\nSB-1,Lamp\n"))
            .unwrap_err();
        match err {
            FeedError::Schema { missing } => assert_eq!(missing, vec!["stock".to_string()]),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn stock_values_coerce_like_integers() {
        assert_eq!(parse_stock("7"), 7);
        assert_eq!(parse_stock(" 7 "), 7);
        assert_eq!(parse_stock("7.9"), 7);
        assert_eq!(parse_stock("abc"), 0);
        assert_eq!(parse_stock(""), 0);
        assert_eq!(parse_stock("-2"), -2);
    }
}
