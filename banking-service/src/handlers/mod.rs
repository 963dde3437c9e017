pub mod accounts;
pub mod beneficiaries;
pub mod health;
pub mod payments;
pub mod statements;
pub mod transactions;

pub use health::{health_check, index, metrics, not_found};
