//! Banking Service - Mock banking REST API over generated in-memory data.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use std::sync::Arc;
use tokio::sync::Mutex;

use config::Config;
use models::{Account, Beneficiary, Payment, Statement, Transaction};
use services::{seed, EntityStore, MockDataGenerator};

pub use startup::{build_router, Application};

/// Shared application state: one store per resource plus the generator.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub accounts: EntityStore<Account>,
    pub transactions: EntityStore<Transaction>,
    pub payments: EntityStore<Payment>,
    pub beneficiaries: EntityStore<Beneficiary>,
    pub statements: EntityStore<Statement>,
    pub generator: Arc<Mutex<MockDataGenerator>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let generator = MockDataGenerator::from_config(&config.mock_data);
        Self::with_generator(config, generator)
    }

    /// Seed every store from `generator`, then keep it for request-time data.
    pub fn with_generator(config: Config, mut generator: MockDataGenerator) -> Self {
        let data = seed::generate(&mut generator);

        tracing::info!(
            accounts = data.accounts.len(),
            transactions = data.transactions.len(),
            payments = data.payments.len(),
            beneficiaries = data.beneficiaries.len(),
            statements = data.statements.len(),
            "Seeded in-memory stores"
        );

        Self {
            config,
            accounts: EntityStore::seeded(data.accounts),
            transactions: EntityStore::seeded(data.transactions),
            payments: EntityStore::seeded(data.payments),
            beneficiaries: EntityStore::seeded(data.beneficiaries),
            statements: EntityStore::seeded(data.statements),
            generator: Arc::new(Mutex::new(generator)),
        }
    }
}
