use clap::Parser;
use phishguard_app::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    run(Cli::parse()).await
}
