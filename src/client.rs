use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::models::{Follower, Profile, Repository};

const API_BASE: &str = "https://api.github.com";

/// Creates a preconfigured HTTP client with required headers.
///
/// The token is attached as an `Authorization: token <credential>` header
/// and marked sensitive so it never shows up in debug output.
pub fn build_client(token: Option<&str>) -> Result<Client> {
    use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static("github-user-search"));
    headers.insert("Accept", HeaderValue::from_static("application/vnd.github.v3+json"));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("token {token}"))
            .context("Invalid token value")?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetches a GitHub user profile by username.
pub async fn fetch_profile(client: &Client, username: &str) -> Result<Profile> {
    get_json(client, &format!("{API_BASE}/users/{username}"), "profile").await
}

/// Fetches the user's followers.
pub async fn fetch_followers(client: &Client, username: &str) -> Result<Vec<Follower>> {
    get_json(
        client,
        &format!("{API_BASE}/users/{username}/followers"),
        "followers",
    )
    .await
}

/// Fetches the user's repositories. Only the language field is kept.
pub async fn fetch_repositories(client: &Client, username: &str) -> Result<Vec<Repository>> {
    get_json(
        client,
        &format!("{API_BASE}/users/{username}/repos"),
        "repositories",
    )
    .await
}

async fn get_json<T: DeserializeOwned>(client: &Client, url: &str, what: &str) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send {what} request"))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("GitHub API error ({status}): {body}");
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to deserialize {what} response"))
}
