//! Product import reconciliation.
//!
//! Consumes a parsed feed and creates the products the catalog is missing.
//! Existing SKUs are skipped entirely - curated listings are never
//! overwritten by a feed run. New products land as drafts with stock
//! management enabled and quantity zero; the stock reconciler fills
//! quantities in on its own schedule.
//!
//! Row problems are isolated: a bad row is counted and the run continues.
//! Only a missing required column aborts the whole import.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::instrument;
use url::Url;

use superball_core::{NewProduct, ProductId, Sku};

use crate::catalog::ProductCatalog;
use crate::config::SupplierConfig;
use crate::diag::DiagnosticLog;
use crate::feed::{Column, FeedError, FeedRow, ParsedFeed};

/// Columns an import run cannot do without.
const REQUIRED_COLUMNS: &[Column] = &[Column::Sku, Column::Name, Column::Price];

/// Aggregate result of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Products created this run.
    pub imported: u32,
    /// Rows whose SKU already exists in the catalog.
    pub skipped_existing: u32,
    /// Rows that could not be processed.
    pub errors: u32,
}

/// Creates missing catalog products from feed rows.
pub struct ProductImporter<'a> {
    catalog: &'a dyn ProductCatalog,
    /// Percent markup applied to feed prices.
    markup: Decimal,
    diag: DiagnosticLog,
}

impl<'a> ProductImporter<'a> {
    pub fn new(
        config: &SupplierConfig,
        catalog: &'a dyn ProductCatalog,
        diag: DiagnosticLog,
    ) -> Self {
        Self {
            catalog,
            markup: config.price_markup,
            diag,
        }
    }

    /// Import every new product in the feed.
    ///
    /// # Errors
    ///
    /// [`FeedError::Schema`] when a required column is missing; the run
    /// aborts before touching any row. Individual row failures are counted
    /// in the summary instead.
    #[instrument(skip_all)]
    pub fn import(&self, feed: &ParsedFeed) -> Result<ImportSummary, FeedError> {
        feed.require_columns(REQUIRED_COLUMNS).inspect_err(|e| {
            self.diag
                .log(format!("Product import aborted: {e}"));
        })?;

        self.diag.log("Starting product import from feed.");
        let mut summary = ImportSummary::default();

        for row in feed.rows() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    self.diag.log(format!("{e}. Skipping."));
                    summary.errors += 1;
                    continue;
                }
            };
            match self.import_row(&row) {
                Ok(RowOutcome::Imported) => summary.imported += 1,
                Ok(RowOutcome::SkippedExisting) => summary.skipped_existing += 1,
                Err(message) => {
                    self.diag
                        .log(format!("Row at line {}: {message}. Skipping.", row.line()));
                    summary.errors += 1;
                }
            }
        }

        self.diag.log(format!(
            "Product import finished. Imported: {}, Skipped existing: {}, Errors: {}.",
            summary.imported, summary.skipped_existing, summary.errors
        ));
        Ok(summary)
    }

    fn import_row(&self, row: &FeedRow<'_>) -> Result<RowOutcome, String> {
        let sku = Sku::new(row.get(Column::Sku).unwrap_or_default());
        if sku.is_empty() {
            return Err("empty SKU".to_string());
        }
        let name = row.get(Column::Name).unwrap_or_default().to_string();

        // Non-numeric price reads as zero, not as a row failure.
        let price = row
            .get(Column::Price)
            .and_then(|p| Decimal::from_str(p).ok())
            .unwrap_or(Decimal::ZERO);
        let price_with_markup = apply_markup(price, self.markup);

        if let Some(existing) = self
            .catalog
            .product_id_by_sku(&sku)
            .map_err(|e| e.to_string())?
        {
            self.diag.log(format!(
                "Product with SKU '{sku}' already exists (ID: {existing}). Skipping import."
            ));
            return Ok(RowOutcome::SkippedExisting);
        }

        let description = row.get(Column::Description).unwrap_or_default().to_string();
        let product_id = self
            .catalog
            .create_product(NewProduct {
                sku: sku.clone(),
                name,
                price: price_with_markup,
                description,
                purchase_cost: price,
            })
            .map_err(|e| e.to_string())?;

        self.diag.log(format!(
            "Imported product with SKU '{sku}' (ID: {product_id}) at price {price_with_markup} (markup: {}%).",
            self.markup
        ));

        // Image failures never undo the creation that already happened.
        self.attach_images(product_id, row.get(Column::Images));
        Ok(RowOutcome::Imported)
    }

    /// First image URL becomes the primary image, the rest go to the
    /// gallery, deduplicated against already-attached entries. Invalid
    /// URLs and failed attaches are logged and skipped.
    fn attach_images(&self, product_id: ProductId, images_field: Option<&str>) {
        let Some(field) = images_field.filter(|f| !f.is_empty()) else {
            return;
        };

        let mut urls = field
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| (u, parse_image_url(u)));

        if let Some((raw, parsed)) = urls.next() {
            match parsed {
                Some(url) => match self
                    .catalog
                    .attach_remote_image(product_id, &url)
                    .and_then(|a| {
                        self.catalog.set_featured_image(product_id, a).map(|()| a)
                    }) {
                    Ok(_) => self.diag.log(format!(
                        "Featured image for product ID {product_id} set from URL: {raw}"
                    )),
                    Err(e) => self.diag.log(format!(
                        "Failed to set featured image for product ID {product_id} from URL: {raw}. Error: {e}"
                    )),
                },
                None => self.diag.log(format!("Invalid image URL: {raw}")),
            }
        }

        for (raw, parsed) in urls {
            let Some(url) = parsed else {
                self.diag.log(format!("Invalid image URL: {raw}"));
                continue;
            };
            let attachment = match self.catalog.attach_remote_image(product_id, &url) {
                Ok(a) => a,
                Err(e) => {
                    self.diag.log(format!(
                        "Failed to add gallery image for product ID {product_id} from URL: {raw}. Error: {e}"
                    ));
                    continue;
                }
            };
            match self.catalog.gallery(product_id) {
                Ok(gallery) if gallery.contains(&attachment) => {}
                Ok(_) => {
                    if let Err(e) = self.catalog.append_gallery_image(product_id, attachment) {
                        self.diag.log(format!(
                            "Failed to add gallery image for product ID {product_id}: {e}"
                        ));
                    } else {
                        self.diag.log(format!(
                            "Gallery image added for product ID {product_id} from URL: {raw}"
                        ));
                    }
                }
                Err(e) => self.diag.log(format!(
                    "Failed to read gallery for product ID {product_id}: {e}"
                )),
            }
        }
    }
}

enum RowOutcome {
    Imported,
    SkippedExisting,
}

/// `final = price * (1 + markup / 100)`.
fn apply_markup(price: Decimal, markup_percent: Decimal) -> Decimal {
    price * (Decimal::ONE + markup_percent / Decimal::ONE_HUNDRED)
}

/// Basic URL-syntax validation; only web URLs are attachable.
fn parse_image_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}
