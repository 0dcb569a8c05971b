use serde::Deserialize;

/// A GitHub user profile from the `/users/{username}` API.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub login: String,
    pub avatar_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
}

/// A single entry from the `/users/{username}/followers` API.
#[derive(Debug, Clone, Deserialize)]
pub struct Follower {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

/// A repository from the `/users/{username}/repos` API.
///
/// Only the primary language matters here; everything else in the
/// response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub language: Option<String>,
}
