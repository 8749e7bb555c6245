//! Command-line layer - argument parsing and command handlers
//!
//! Handlers run against a [`Session`] and return the text to print. Rejected user input
//! (validation failures, unknown ids, unparseable import files) is reported as a `❌`
//! message rather than an error, like a chat reply would be; only store failures
//! propagate as [`Error`].

/// clap argument definitions
pub mod args;
/// Component command handlers
pub mod components;
/// Status, dashboard and advisor handlers
pub mod general;
/// Product command handlers
pub mod products;

pub use args::{Cli, Command, ComponentCommand, ProductCommand};

use crate::{
    config::catalog::SeedCatalog,
    core::{
        advisor::{CostAdvisor, GeminiAdvisor},
        remote::{HttpBackend, RemoteBackend},
        seed::{LoadedCatalog, initial_load},
        service::{DataService, Served},
    },
    errors::{Error, Result},
};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Everything a command needs: the data service, the working catalog and the advisor.
#[derive(Debug)]
pub struct Session<B = HttpBackend, A = GeminiAdvisor> {
    /// Persistence entry point
    pub service: DataService<B>,
    /// Working catalog, kept in step with successful writes
    pub catalog: LoadedCatalog,
    /// Cost advisor
    pub advisor: A,
    unsaved_components: HashSet<String>,
    unsaved_products: HashSet<String>,
}

impl<B: RemoteBackend, A: CostAdvisor> Session<B, A> {
    /// Runs the initial load (seeding on first run) and wraps the result in a session.
    pub async fn start(service: DataService<B>, defaults: &SeedCatalog, advisor: A) -> Self {
        let catalog = initial_load(&service, defaults).await;
        debug!(
            "Session started with {} components and {} products",
            catalog.components.len(),
            catalog.products.len()
        );
        Self {
            service,
            unsaved_components: catalog.unsaved_component_ids(),
            unsaved_products: catalog.unsaved_product_ids(),
            catalog,
            advisor,
        }
    }

    /// Executes a command and returns the text to print.
    #[instrument(skip(self))]
    pub async fn run(&mut self, command: Option<Command>) -> Result<String> {
        let outcome = match command.unwrap_or(Command::Dashboard) {
            Command::Status => Ok(general::status(self)),
            Command::Dashboard => Ok(general::dashboard(self)),
            Command::Advise => Ok(general::advise(self).await),
            Command::Components(command) => components::run(self, command).await,
            Command::Products(command) => products::run(self, command).await,
        };
        user_facing(outcome)
    }
}

/// Turns rejected input into a `❌` reply and lets every other error through.
pub fn user_facing(outcome: Result<String>) -> Result<String> {
    match outcome {
        Err(
            e @ (Error::Validation { .. }
            | Error::InvalidAmount { .. }
            | Error::ComponentNotFound { .. }
            | Error::ProductNotFound { .. }
            | Error::Import { .. }),
        ) => Ok(format!("❌ {e}")),
        other => other,
    }
}

impl<B, A> Session<B, A> {
    /// Rejects edits of a default component that was shown but never saved.
    pub(crate) fn ensure_component_saved(&self, id: &str, name: &str) -> Result<()> {
        if self.unsaved_components.contains(id) {
            return Err(unsaved_default(name, "components"));
        }
        Ok(())
    }

    /// Rejects deletes of a default product that was shown but never saved.
    pub(crate) fn ensure_product_saved(&self, id: &str, name: &str) -> Result<()> {
        if self.unsaved_products.contains(id) {
            return Err(unsaved_default(name, "products"));
        }
        Ok(())
    }
}

fn unsaved_default(name: &str, kind: &str) -> Error {
    Error::Validation {
        message: format!(
            "{name} is part of the default catalog, which is not saved to the backend. \
             Add your own {kind} first."
        ),
    }
}

/// Suffix telling the user where a write landed.
pub(crate) const fn saved_to<T>(served: &Served<T>) -> &'static str {
    if served.is_remote() {
        "saved to remote backend"
    } else {
        "saved locally"
    }
}
