use clap::Parser;
use dotenvy::dotenv;
use jewel_cost::{
    cli::{Cli, Session},
    config::{catalog, settings::Settings},
    core::{
        advisor::GeminiAdvisor, local_store::LocalStore, remote::HttpBackend, service::DataService,
    },
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Parse the command line before touching any storage
    let cli = Cli::parse();

    // 4. Settings and seed catalog
    let settings = Settings::from_env();
    let defaults = catalog::load_catalog_or_default(&settings.catalog_path)
        .inspect_err(|e| error!("Failed to load seed catalog: {}", e))?;

    // 5. Local store
    let local = LocalStore::connect(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to open local store: {}", e))?;

    // 6. Remote backend, when configured
    let remote = match settings.api_url.as_deref() {
        Some(url) => Some(HttpBackend::new(url)?),
        None => {
            info!("API_URL not set, running on local storage only");
            None
        }
    };
    let service = DataService::new(remote, local);

    // 7. Initial load and command dispatch
    let advisor = GeminiAdvisor::new(&settings.advisor)?;
    let mut session = Session::start(service, &defaults, advisor).await;
    let output = session.run(cli.command).await?;
    println!("{output}");

    Ok(())
}
