//! Settings inspection commands.

use super::{CliError, Context};

/// Print the stock update schedule the host scheduler should honor.
#[allow(clippy::print_stdout)]
pub fn stock_schedule(ctx: &Context) -> Result<(), CliError> {
    if ctx.config.stock_update_enabled {
        println!(
            "Automatic stock updates enabled, frequency: {}.",
            ctx.config.stock_update_frequency.as_str()
        );
    } else {
        println!("Automatic stock updates disabled.");
    }
    Ok(())
}
