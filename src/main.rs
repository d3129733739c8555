//! CLI entry point for linuxai.

mod app;
mod cli;

use clap::Parser;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    app::startup::init_logging();
    let code = app::entry::run(args).await;
    std::process::exit(code);
}
