use clap::Parser;
use weather_dashboard::cli::{Cli, run};
use weather_dashboard::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
