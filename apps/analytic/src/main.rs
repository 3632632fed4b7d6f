//! Analytic service
//!
//! Binary entry point for the event command dispatcher.

use core_config::tracing::install_color_eyre;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    analytic::run().await
}
