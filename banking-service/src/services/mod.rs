//! Services module for banking-service.

pub mod documents;
pub mod generator;
pub mod metrics;
pub mod query;
pub mod seed;
pub mod store;

pub use generator::{MockDataGenerator, PaymentOrder, StatementLine};
pub use self::metrics::{get_metrics, init_metrics};
pub use query::{CollectionQuery, Filterable, Page, PageRequest, Pagination, QuerySpec};
pub use seed::SeedData;
pub use store::{Entity, EntityStore};
