//! Reshaping generic environment properties into backend options.

use serde::de::DeserializeOwned;
use tracing::debug;

use kiln_schema::ExecutionEnvironment;

use crate::error::BuildError;

/// Convert an environment's generic properties bag into the typed options
/// struct a backend expects.
///
/// The conversion is structural: fields are matched by name, unknown source
/// fields are ignored, and missing target fields take their defaults. An
/// absent or null bag is valid and yields the default options.
pub fn adapt_properties<T>(env: &ExecutionEnvironment) -> crate::Result<T>
where
  T: DeserializeOwned + Default,
{
  match &env.properties {
    None => {
      debug!(environment = %env.name, "no environment properties set, using defaults");
      Ok(T::default())
    }
    Some(value) if value.is_null() => {
      debug!(environment = %env.name, "null environment properties, using defaults");
      Ok(T::default())
    }
    Some(value) => {
      serde_json::from_value(value.clone()).map_err(|source| BuildError::EnvironmentAdapt {
        environment: env.name.clone(),
        source,
      })
    }
  }
}
