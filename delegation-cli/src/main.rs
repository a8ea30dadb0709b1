use clap::Parser;
use delegation_cli::{
    cli::Cli,
    commands,
    telemetry::{setup_logger, setup_telemetry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.global.plain_logs {
        setup_logger();
    } else {
        setup_telemetry();
    }
    commands::run(cli).await
}
