//! # vet-sdk CLI
//!
//! A thin demonstration binary over `vet-sdk`: generate wallets, derive accounts, and
//! sign/broadcast VeChainThor transactions from the command line.

mod command;

use clap::Parser;
use env_logger::{Builder, Env};
use log::info;

fn init_logger() {
    let env = Env::default()
        .filter_or("RUST_LOG", "info")
        .write_style_or("RUST_LOG_STYLE", "always");

    Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("Logger initialized");
}

#[tokio::main]
async fn main() {
    init_logger();

    let opts = command::Opts::parse();

    if let Err(e) = command::run(opts).await {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
