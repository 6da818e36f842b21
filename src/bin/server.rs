//! Game server binary.
//!
//! Boots the content catalogue, then serves WebSocket game rooms over
//! HTTP. The port comes from `--port` or the CRESTFORGE_PORT env var.

use clap::Parser;
use crestforge::catalog::Catalog;
use crestforge::session::Server;

#[derive(Parser)]
#[command(about = "Authoritative auto-battler server")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "CRESTFORGE_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    crestforge::init();
    let catalog = Catalog::get();
    log::info!(
        "catalogue loaded: {} units, {} items, {} traits",
        catalog.units().count(),
        catalog.items().len(),
        catalog.traitdefs().len()
    );
    Server::run(args.port).await.expect("server runs");
}
