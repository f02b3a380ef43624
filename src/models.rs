use serde::Deserialize;
use serde_json::Value;

/// The subset of `/users/{username}` the card uses.
///
/// Every field is optional so a sparse profile still deserializes; the
/// collector fills in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct GitHubUser {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: Option<u64>,
    #[serde(default)]
    pub followers: Option<u64>,
}

/// Sums `stargazers_count` over a `/users/{username}/repos` body.
///
/// A body that is not an array counts as no repositories. Entries without a
/// non-negative integer count contribute nothing.
pub fn total_stars(repos: &Value) -> u64 {
    repos
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .map(|repo| {
                    repo.get("stargazers_count")
                        .and_then(Value::as_u64)
                        .unwrap_or(0)
                })
                .fold(0u64, u64::saturating_add)
        })
        .unwrap_or(0)
}

/// Aggregated statistics rendered onto the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    /// Inlined `data:` URI.
    pub avatar: String,
    pub display_name: String,
    pub bio: String,
    pub repo_count: u64,
    pub star_total: u64,
    pub follower_count: u64,
    pub contribution_estimate: u64,
    pub pinned_count: u64,
}

/// Placeholder for a real contribution count.
pub fn contribution_estimate(repo_count: u64) -> u64 {
    repo_count.saturating_mul(10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #[test]
        fn stars_sum_any_repository_list(counts in prop::collection::vec(prop::option::of(any::<u64>()), 0..64)) {
            let repos = Value::Array(
                counts
                    .iter()
                    .map(|count| match count {
                        Some(n) => json!({"stargazers_count": n}),
                        None => json!({"stargazers_count": "n/a"}),
                    })
                    .collect(),
            );
            let expected = counts
                .iter()
                .map(|count| count.unwrap_or(0))
                .fold(0u64, u64::saturating_add);

            prop_assert_eq!(total_stars(&repos), expected);
        }

        #[test]
        fn contribution_estimate_tracks_repo_count(repos in 0u64..=u64::MAX / 10) {
            prop_assert_eq!(contribution_estimate(repos), repos * 10);
        }
    }

    #[test]
    fn stars_sum_numeric_counts() {
        let repos = json!([{"stargazers_count": 3}, {"stargazers_count": 7}]);
        assert_eq!(total_stars(&repos), 10);
    }

    #[test]
    fn stars_ignore_missing_and_non_numeric_counts() {
        let repos = json!([
            {"stargazers_count": 4},
            {"name": "no-count"},
            {"stargazers_count": "12"},
            {"stargazers_count": null},
            {"stargazers_count": -3},
            {"stargazers_count": 1.5},
            "not-an-object",
            {"stargazers_count": 6}
        ]);
        assert_eq!(total_stars(&repos), 10);
    }

    #[test]
    fn stars_are_zero_for_empty_or_non_array_bodies() {
        assert_eq!(total_stars(&json!([])), 0);
        assert_eq!(total_stars(&json!({"message": "Not Found"})), 0);
        assert_eq!(total_stars(&json!(null)), 0);
    }

    #[test]
    fn contribution_estimate_is_ten_per_repo() {
        for repos in [0u64, 1, 5, 37, 1000] {
            assert_eq!(contribution_estimate(repos), repos * 10);
        }
        assert_eq!(contribution_estimate(u64::MAX), u64::MAX);
    }

    #[test]
    fn sparse_profile_deserializes() {
        let user: GitHubUser = serde_json::from_value(json!({"login": "alice", "bio": null}))
            .unwrap();
        assert_eq!(user.login.as_deref(), Some("alice"));
        assert!(user.bio.is_none());
        assert!(user.public_repos.is_none());
    }
}
