//! CLI runner - drives the fetch controller and prints what it loads

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::http::{GitHubClient, UserLookup};
use crate::pagination::{FetchState, PaginatedFetchController, StateSubscription};
use crate::types::RepositoryItem;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment variable consulted when no token is given
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List { pages, owners } => self.list(*pages, *owners).await,
            Commands::RateLimit => self.rate_limit().await,
        }
    }

    /// Config file (or defaults) with command-line overrides applied
    fn load_config(&self) -> Result<SearchConfig> {
        let mut config = match &self.cli.config {
            Some(path) => SearchConfig::from_file(path)?,
            None => SearchConfig::default(),
        };

        if let Some(language) = &self.cli.language {
            config.language.clone_from(language);
        }
        if let Some(per_page) = self.cli.per_page {
            config.items_per_page = per_page;
        }
        if let Some(token) = &self.cli.token {
            config.auth_token = Some(token.clone());
        } else if config.auth_token.is_none() {
            config.auth_token = std::env::var(TOKEN_ENV).ok();
        }

        config.validate()?;
        Ok(config)
    }

    async fn list(&self, pages: u32, owners: bool) -> Result<()> {
        let config = self.load_config()?;
        let client = Arc::new(GitHubClient::new(&config)?);
        if !client.is_authenticated() {
            info!("No token configured, requests are subject to the unauthenticated rate limit");
        }

        let controller = PaginatedFetchController::new(client.clone(), &config)?;
        let mut states = controller.subscribe();

        let mut loaded = 0;
        let mut accepted = controller.fetch_first();
        while accepted {
            match wait_for_outcome(&mut states).await? {
                FetchState::Success => loaded += 1,
                FetchState::Error(message) => return Err(Error::Other(message)),
                _ => {}
            }
            info!(
                "Loaded {} of {} results",
                controller.current_count(),
                controller.total_count()
            );
            if loaded >= pages {
                break;
            }
            accepted = controller.fetch_next();
        }

        if owners {
            resolve_owner_names(&controller, client.as_ref()).await;
        }

        let items = controller.items();
        match self.cli.format {
            OutputFormat::Json => {
                for item in &items {
                    println!("{}", serde_json::to_string(item)?);
                }
            }
            OutputFormat::Pretty => {
                for (index, item) in items.iter().enumerate() {
                    println!("{}", format_item(index + 1, item));
                }
                println!(
                    "\n{} of {} results ({} pages loaded)",
                    items.len(),
                    controller.total_count(),
                    loaded
                );
            }
        }
        Ok(())
    }

    async fn rate_limit(&self) -> Result<()> {
        let mut config = self.load_config()?;
        config.items_per_page = 1;

        let client = Arc::new(GitHubClient::new(&config)?);
        let controller = PaginatedFetchController::new(client, &config)?;
        let mut states = controller.subscribe();

        if controller.fetch_first() {
            if let FetchState::Error(message) = wait_for_outcome(&mut states).await? {
                return Err(Error::Other(message));
            }
        }

        let status = controller.rate_limit_status();
        let snapshot = controller
            .rate_limit_snapshot()
            .ok_or_else(|| Error::Other("The server did not report a rate limit".to_string()))?;

        match self.cli.format {
            OutputFormat::Json => println!(
                "{}",
                json!({
                    "remaining": snapshot.remaining,
                    "reset_at": snapshot.reset_at.to_rfc3339(),
                    "is_limit_reached": status.is_limit_reached,
                    "seconds_remaining_to_reset": status.seconds_remaining_to_reset,
                })
            ),
            OutputFormat::Pretty => {
                println!("Remaining requests: {}", snapshot.remaining);
                println!(
                    "Window resets at:   {} (in {}s)",
                    snapshot.reset_at.to_rfc3339(),
                    status.seconds_remaining_to_reset
                );
                println!("Limit reached:      {}", status.is_limit_reached);
            }
        }
        Ok(())
    }
}

/// Wait until the controller leaves the fetching state
async fn wait_for_outcome(states: &mut StateSubscription) -> Result<FetchState> {
    while let Some(state) = states.recv().await {
        debug!("State: {}", state);
        if !state.is_fetching() {
            return Ok(state);
        }
    }
    Err(Error::Other("State stream closed".to_string()))
}

/// Fill in owner display names, looking each login up once
async fn resolve_owner_names(controller: &PaginatedFetchController, lookup: &dyn UserLookup) {
    let mut names: HashMap<String, Option<String>> = HashMap::new();

    for (index, item) in controller.items().iter().enumerate() {
        let login = &item.owner.login;
        if !names.contains_key(login) {
            let name = match lookup.fetch_user(login).await {
                Ok(user) => user.name,
                Err(e) => {
                    warn!("Could not look up {}: {}", login, e);
                    None
                }
            };
            names.insert(login.clone(), name);
        }
        if let Some(Some(name)) = names.get(login) {
            controller.set_owner_name(index, name.clone());
        }
    }
}

fn format_item(rank: usize, item: &RepositoryItem) -> String {
    let owner = match &item.owner.name {
        Some(name) => format!("{} ({})", item.owner.login, name),
        None => item.owner.login.clone(),
    };
    format!("{rank:>4}. {}/{}  ★ {}", owner, item.name, item.stars)
}
