//! Gathers everything the card shows.
//!
//! The profile and repository list are required; the pinned lookup is
//! best-effort; the avatar goes through the fallback chain in
//! [`crate::avatar`].

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::avatar::{avatar_candidates, resolve_avatar};
use crate::client::{fetch_json, HttpFetch};
use crate::config::{CardConfig, GITHUB_ACCEPT};
use crate::error::AcquisitionError;
use crate::models::{contribution_estimate, total_stars, GitHubUser, ProfileCard};

pub struct StatsCollector<'a> {
    fetcher: &'a dyn HttpFetch,
    config: &'a CardConfig,
}

impl<'a> StatsCollector<'a> {
    pub fn new(fetcher: &'a dyn HttpFetch, config: &'a CardConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn collect(&self) -> Result<ProfileCard, AcquisitionError> {
        let profile = self.profile().await?;
        let star_total = self.star_total().await?;
        let pinned_count = self.pinned_count().await;

        let candidates = avatar_candidates(
            &self.config.preferred_avatar_url,
            profile.avatar_url.as_deref(),
            &self.config.default_avatar_url,
            self.config.avatar_size,
        );
        let avatar = resolve_avatar(self.fetcher, &candidates).await?;

        let repo_count = profile.public_repos.unwrap_or(0);
        let card = ProfileCard {
            avatar,
            display_name: profile
                .login
                .unwrap_or_else(|| self.config.subject.clone()),
            bio: profile
                .bio
                .filter(|bio| !bio.trim().is_empty())
                .unwrap_or_else(|| self.config.default_bio.clone()),
            repo_count,
            star_total,
            follower_count: profile.followers.unwrap_or(0),
            contribution_estimate: contribution_estimate(repo_count),
            pinned_count,
        };

        info!(
            subject = %self.config.subject,
            repos = card.repo_count,
            stars = card.star_total,
            followers = card.follower_count,
            pinned = card.pinned_count,
            "collected profile stats"
        );
        Ok(card)
    }

    async fn profile(&self) -> Result<GitHubUser, AcquisitionError> {
        let url = self.config.profile_url();
        debug!(%url, "fetching profile");
        fetch_json(self.fetcher, &url, Some(GITHUB_ACCEPT))
            .await
            .map_err(AcquisitionError::Profile)
    }

    async fn star_total(&self) -> Result<u64, AcquisitionError> {
        let url = self.config.repos_url();
        debug!(%url, "fetching repositories");
        let repos: Value = fetch_json(self.fetcher, &url, Some(GITHUB_ACCEPT))
            .await
            .map_err(AcquisitionError::Repositories)?;
        if !repos.is_array() {
            warn!(%url, "repository list is not an array, counting zero stars");
        }
        Ok(total_stars(&repos))
    }

    /// Never fails: any problem with the lookup yields zero.
    async fn pinned_count(&self) -> u64 {
        let url = self.config.pinned_url();
        debug!(%url, "fetching pinned repositories");
        match fetch_json::<Value>(self.fetcher, &url, None).await {
            Ok(Value::Array(pinned)) => pinned.len() as u64,
            Ok(_) => {
                warn!(%url, "pinned lookup did not return an array, using 0");
                0
            }
            Err(err) => {
                warn!(
                    %url,
                    error = &err as &(dyn std::error::Error + 'static),
                    "pinned lookup failed, using 0"
                );
                0
            }
        }
    }
}
