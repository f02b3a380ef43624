use std::process;

use anyhow::Context;
use github_card::{logging, CardConfig, ReqwestFetcher};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging().context("failed to initialize logging")?;

    let config = CardConfig::default();

    let result = match ReqwestFetcher::new(&config) {
        Ok(fetcher) => github_card::run(&fetcher, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(path) => {
            println!("✅ GitHub stats card written to {}", path.display());
            Ok(())
        }
        Err(e) => {
            let code = e.exit_code();
            let report = anyhow::Error::from(e);
            error!(error = %format!("{report:#}"), "card generation failed");
            eprintln!("Error: {report:#}");
            process::exit(code);
        }
    }
}
