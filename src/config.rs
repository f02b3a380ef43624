//! Fixed settings for a card run.

use std::path::PathBuf;
use std::time::Duration;

/// The profile every run queries.
pub const SUBJECT: &str = "jaxo4life";

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
pub const PINNED_API_BASE: &str = "https://gh-pinned-repos.egoist.dev";

pub const DEFAULT_BIO: &str = "Full-stack & Blockchain";
pub const AVATAR_SIZE: u32 = 240;
pub const OUTPUT_PATH: &str = "assets/github-card.svg";

const USER_AGENT: &str = "github-card-generator";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoints, defaults and limits used by the collector and writer.
#[derive(Debug, Clone)]
pub struct CardConfig {
    pub subject: String,
    pub api_base: String,
    pub pinned_base: String,
    /// Tried before the profile's own avatar.
    pub preferred_avatar_url: String,
    /// Stands in for a profile without `avatar_url`.
    pub default_avatar_url: String,
    pub avatar_size: u32,
    pub default_bio: String,
    pub output_path: PathBuf,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            subject: SUBJECT.to_string(),
            api_base: GITHUB_API_BASE.to_string(),
            pinned_base: PINNED_API_BASE.to_string(),
            preferred_avatar_url: format!("https://github.com/{SUBJECT}.png"),
            default_avatar_url: format!("https://avatars.githubusercontent.com/{SUBJECT}"),
            avatar_size: AVATAR_SIZE,
            default_bio: DEFAULT_BIO.to_string(),
            output_path: PathBuf::from(OUTPUT_PATH),
            user_agent: USER_AGENT.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl CardConfig {
    pub fn profile_url(&self) -> String {
        format!("{}/users/{}", self.api_base, self.subject)
    }

    pub fn repos_url(&self) -> String {
        format!("{}/users/{}/repos?per_page=100", self.api_base, self.subject)
    }

    pub fn pinned_url(&self) -> String {
        format!("{}/?username={}", self.pinned_base, self.subject)
    }
}
