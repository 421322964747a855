//! Common types used throughout superstars
//!
//! Wire and domain types for the repository search endpoint and the user
//! lookup endpoint. Field names follow the JSON the API sends.

use serde::{Deserialize, Serialize};

// ============================================================================
// Search Results
// ============================================================================

/// One repository returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryItem {
    /// Stable repository identifier
    pub id: u64,
    /// Repository name (without owner)
    pub name: String,
    /// Popularity metric the search is sorted by
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
    /// Owning account
    pub owner: Owner,
}

/// Owner sub-record of a [`RepositoryItem`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Account login
    pub login: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Display name. The search payload never carries it; it is filled in
    /// later from a user lookup.
    #[serde(default, skip_deserializing)]
    pub name: Option<String>,
}

impl Owner {
    /// Name to show for this owner, falling back to the login
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

/// One decoded page of search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total number of matches the server reports (not capped)
    pub total_count: u64,
    /// Whether the server gave up before scanning every match
    #[serde(default)]
    pub incomplete_results: bool,
    /// Items of this page, in server order
    #[serde(default)]
    pub items: Vec<RepositoryItem>,
}

impl SearchPage {
    /// Create a page from a total and its items
    pub fn new(total_count: u64, items: Vec<RepositoryItem>) -> Self {
        Self {
            total_count,
            incomplete_results: false,
            items,
        }
    }
}

// ============================================================================
// User Lookup
// ============================================================================

/// Account details from the user endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account login
    pub login: String,
    /// Display name, if the account set one
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}
