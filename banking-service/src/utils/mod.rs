pub mod ids;
pub mod validation;

pub use ids::IdKind;
pub use validation::{ApiJson, FieldErrors, JsonBody, JsonKind, QueryParams};
