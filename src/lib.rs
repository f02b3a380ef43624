//! Build-time generator for a GitHub profile stat card.
//!
//! One run fetches the configured profile, its repositories, a pinned
//! repository count and an avatar, renders a self-contained SVG and writes
//! it to disk. Nothing is written when any required fetch fails.

pub mod avatar;
pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod render;

use std::path::PathBuf;

use tracing::info;

pub use client::{HttpFetch, HttpResponse, MemoryFetcher, ReqwestFetcher};
pub use collector::StatsCollector;
pub use config::CardConfig;
pub use error::{AcquisitionError, CardError, FetchError};
pub use models::ProfileCard;

/// Collects, renders and writes the card. Returns the path written.
pub async fn run(fetcher: &dyn HttpFetch, config: &CardConfig) -> Result<PathBuf, CardError> {
    info!(subject = %config.subject, "generating card");

    let card = StatsCollector::new(fetcher, config).collect().await?;
    let svg = render::render_card(&card);
    output::write_card(&config.output_path, &svg)?;

    Ok(config.output_path.clone())
}
