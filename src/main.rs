use clap::Parser;
use mockbank::adapters::document_loader::DocumentLoader;
use mockbank::adapters::mock_bank::MockBank;
use mockbank::adapters::route_sink::FileRouteSink;
use mockbank::cli::Cli;
use mockbank::config::Settings;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the imposter JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    info!(
        spec = %cli.spec.display(),
        policy = %settings.generation.policy,
        "Starting mockbank"
    );

    let document = DocumentLoader::load(&cli.spec).await?;
    let bank = MockBank::new(settings);
    let sink = FileRouteSink::new(cli.output.clone());
    bank.publish(&document, &sink).await?;

    Ok(())
}
