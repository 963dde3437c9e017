use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Environment prefix shared by all services: `APP_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "APP";

/// Load a service configuration.
///
/// Sources are layered: serde defaults on `T`, then the optional file at
/// `file` (any format the `config` crate recognises by extension), then
/// `APP_`-prefixed environment variables with `__` as the nesting separator.
pub fn load<T: DeserializeOwned>(file: impl AsRef<Path>) -> Result<T, AppError> {
    dotenvy::dotenv().ok();

    let config = Cfg::builder()
        .add_source(File::from(file.as_ref()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}
