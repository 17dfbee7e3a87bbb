//! Timing configuration loading
//!
//! Options come from an optional TOML document overlaid field-by-field onto
//! the defaults, with command-line overrides applied last.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use typewriter::TypewriterOptions;

/// Load timing options from an optional TOML file, then apply overrides.
pub fn load_options(path: Option<&Path>, start_delay: Option<u64>) -> Result<TypewriterOptions> {
    let mut options = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => TypewriterOptions::default(),
    };

    if let Some(ms) = start_delay {
        options.type_start_delay = ms;
    }

    Ok(options)
}
