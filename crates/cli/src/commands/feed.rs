//! Feed import and stock update commands.

use superball_sync::{FeedClient, ProductImporter, StockReconciler};

use super::{CliError, Context};

/// Fetch the feed and create missing catalog products.
#[allow(clippy::print_stdout)]
pub async fn import_products(ctx: &Context) -> Result<(), CliError> {
    let feed = FeedClient::new(&ctx.config, ctx.diag.clone())?
        .fetch()
        .await?;
    let importer = ProductImporter::new(&ctx.config, &ctx.store, ctx.diag.clone());
    let summary = importer.import(&feed)?;
    println!(
        "Import finished. Imported: {}, skipped existing: {}, errors: {}.",
        summary.imported, summary.skipped_existing, summary.errors
    );
    Ok(())
}

/// Fetch the feed and reconcile stock quantities.
#[allow(clippy::print_stdout)]
pub async fn update_stock(ctx: &Context) -> Result<(), CliError> {
    let feed = FeedClient::new(&ctx.config, ctx.diag.clone())?
        .fetch()
        .await?;
    let reconciler = StockReconciler::new(&ctx.store, ctx.diag.clone());
    let summary = reconciler.reconcile(&feed)?;
    println!(
        "Stock update finished. Updated: {}, errors: {}.",
        summary.updated, summary.errors
    );
    Ok(())
}
