//! Policy entry point that hides config discovery and console setup.

use std::path::Path;

use midd_config::EngineConfig;
use midd_policy::{Pdp, PolicyDocument, Result};
use tracing::debug;

/// Engine configuration looked up in the working directory.
pub const CONFIG_FILE: &str = "midd.toml";

/// Loads and compiles the policy document at `policy_path`.
///
/// Settings come from [`CONFIG_FILE`] when it exists and are the defaults
/// otherwise. With the `console` feature the colored log output is
/// installed first, using the configured filter.
pub fn open(policy_path: impl AsRef<Path>) -> Result<Pdp> {
    let config = if Path::new(CONFIG_FILE).exists() {
        EngineConfig::load(CONFIG_FILE)?
    } else {
        EngineConfig::default()
    };

    #[cfg(feature = "console")]
    midd_console::init_with(&config.logging);

    debug!(event = "open", policy = %policy_path.as_ref().display());

    let document = PolicyDocument::load(policy_path)?;
    Pdp::from_document(&document, config)
}
