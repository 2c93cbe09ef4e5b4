use anyhow::Result;
use clap::Parser;
use ocputils::Cli;
use tracing_log::AsTrace;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_max_level(cli.verbose.log_level_filter().as_trace())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  ocputils::run(&cli).await?;

  Ok(())
}
