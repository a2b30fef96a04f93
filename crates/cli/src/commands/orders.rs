//! Order sync commands.

use superball_core::{OrderId, SupplierOrderId};
use superball_sync::{SupplierApiClient, SyncOrchestrator, SyncOutcome};

use super::{CliError, Context};

/// Send a single order to the supplier.
#[allow(clippy::print_stdout)]
pub async fn sync_order(ctx: &Context, id: u64) -> Result<(), CliError> {
    let api = SupplierApiClient::new(&ctx.config, ctx.diag.clone())?;
    let orchestrator =
        SyncOrchestrator::new(&api, &ctx.store, &ctx.store, ctx.diag.clone());

    match orchestrator.sync_one(OrderId::new(id)).await? {
        SyncOutcome::Sent(supplier_order_id) => {
            println!("Order {id} sent to Superball (supplier order {supplier_order_id}).");
            Ok(())
        }
        SyncOutcome::AlreadySent => Err(CliError::Failed(format!("Order {id} already sent."))),
        SyncOutcome::NoEligibleProducts => Err(CliError::Failed(format!(
            "No Superball products in order {id}."
        ))),
    }
}

/// Send every unsent candidate order.
#[allow(clippy::print_stdout)]
pub async fn sync_all(ctx: &Context) -> Result<(), CliError> {
    let api = SupplierApiClient::new(&ctx.config, ctx.diag.clone())?;
    let orchestrator =
        SyncOrchestrator::new(&api, &ctx.store, &ctx.store, ctx.diag.clone());

    let report = orchestrator.sync_all_unsent().await?;
    if report.is_success() {
        println!("{}", report.summary());
        Ok(())
    } else {
        Err(CliError::Failed(report.summary()))
    }
}

/// Read an order back from the supplier and print its payload.
#[allow(clippy::print_stdout)]
pub async fn show_order(ctx: &Context, supplier_order_id: &str) -> Result<(), CliError> {
    let api = SupplierApiClient::new(&ctx.config, ctx.diag.clone())?;
    let details = api
        .fetch_order(&SupplierOrderId::new(supplier_order_id))
        .await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string())
    );
    Ok(())
}
