//! GitHub user record and its normalized profile.

use serde::{Deserialize, Serialize};

/// A GitHub user as returned by `GET /users/{login}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    /// Numeric account id.
    pub id: u64,
    /// Login handle.
    pub login: String,
    /// Profile name.
    #[serde(default)]
    pub name: Option<String>,
    /// Fully-qualified avatar URL.
    pub avatar_url: String,
    /// Profile page URL.
    pub html_url: String,
    /// Profile bio.
    #[serde(default)]
    pub bio: Option<String>,
    /// Public repository count.
    #[serde(default)]
    pub public_repos: u32,
    /// Follower count.
    #[serde(default)]
    pub followers: u32,
    /// Accounts followed.
    #[serde(default)]
    pub following: u32,
    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,
    /// Company.
    #[serde(default)]
    pub company: Option<String>,
    /// Blog or website.
    #[serde(default)]
    pub blog: Option<String>,
}

/// Normalized profile served by `GET /api/github/:username`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GitHubProfile {
    /// Numeric account id.
    pub id: u64,
    /// Login handle.
    pub username: String,
    /// Profile name, falling back to the login.
    pub display_name: String,
    /// Avatar URL.
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
    /// Profile page URL.
    #[serde(rename = "profileUrl")]
    pub profile_url: String,
    /// Bio text.
    pub bio: Option<String>,
    /// Public repository count.
    pub public_repos: u32,
    /// Follower count.
    pub followers: u32,
    /// Following count.
    pub following: u32,
    /// Free-form location.
    pub location: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Blog or website.
    pub blog: Option<String>,
}

impl From<&GitHubUser> for GitHubProfile {
    fn from(user: &GitHubUser) -> Self {
        let display_name = user
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&user.login)
            .to_string();

        Self {
            id: user.id,
            username: user.login.clone(),
            display_name,
            avatar_url: user.avatar_url.clone(),
            profile_url: user.html_url.clone(),
            bio: user.bio.clone(),
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            location: user.location.clone(),
            company: user.company.clone(),
            blog: user.blog.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn octocat() -> GitHubUser {
        serde_json::from_str(
            r#"{
                "login": "octocat",
                "id": 583231,
                "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
                "html_url": "https://github.com/octocat",
                "name": "The Octocat",
                "company": "@github",
                "blog": "https://github.blog",
                "location": "San Francisco",
                "bio": null,
                "public_repos": 8,
                "followers": 9000,
                "following": 9,
                "site_admin": false
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_profile_from_user() {
        let profile = GitHubProfile::from(&octocat());
        assert_eq!(profile.username, "octocat");
        assert_eq!(profile.display_name, "The Octocat");
        assert_eq!(profile.profile_url, "https://github.com/octocat");
        assert_eq!(profile.followers, 9000);
        assert_eq!(profile.bio, None);
    }

    #[test]
    fn test_profile_display_name_falls_back_to_login() {
        let mut user = octocat();
        user.name = None;
        assert_eq!(GitHubProfile::from(&user).display_name, "octocat");
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let user: GitHubUser = serde_json::from_str(
            r#"{"login":"ghost","id":10137,"avatar_url":"a","html_url":"h"}"#,
        )
        .unwrap();
        assert_eq!(user.public_repos, 0);
        assert_eq!(user.followers, 0);
    }

    #[test]
    fn test_profile_json_keys() {
        let json = serde_json::to_value(GitHubProfile::from(&octocat())).unwrap();
        assert_eq!(json["profileUrl"], "https://github.com/octocat");
        assert_eq!(json["avatarUrl"], "https://avatars.githubusercontent.com/u/583231?v=4");
    }
}
