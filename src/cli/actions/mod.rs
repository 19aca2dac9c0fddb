pub mod auth;
pub mod catalog;

// The match over every `Action` lives in `run` so this module stays a list of
// what the CLI can do.
mod run;

use crate::cli::globals::GlobalArgs;
use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Status,
    Login {
        email: String,
        password: SecretString,
    },
    Google {
        credential: SecretString,
    },
    Check {
        email: String,
        hosted_domain: Option<String>,
    },
    Logout,
    Whoami,
    Products {
        category: Option<String>,
        supplier: Option<String>,
    },
    Search {
        query: String,
    },
    Order {
        fields: Vec<(String, String)>,
    },
    Materials {
        category: Option<String>,
    },
    Updates,
    Stats {
        franchise_id: String,
    },
}

/// Adds a retry hint to errors that may go away on their own.
fn user_facing(err: crate::portal::Error) -> anyhow::Error {
    if err.is_retryable() {
        anyhow::anyhow!("{err} Please try again.")
    } else {
        anyhow::Error::new(err)
    }
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> anyhow::Result<()> {
        run::execute(self, globals).await
    }
}
