//! Timing options for the typewriter animation
//!
//! All values are in milliseconds. Per-character delays are drawn uniformly
//! from their `[min, max]` range on every tick; the end-of-phase delays are
//! fixed. That asymmetry is deliberate - the pause at a fully typed or fully
//! deleted phrase reads differently from the per-keystroke jitter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing configuration for a [`Typewriter`](crate::Typewriter).
///
/// Every field falls back to its default when absent, so a partial TOML or
/// JSON document overlays cleanly:
///
/// ```
/// use typewriter::TypewriterOptions;
///
/// let options: TypewriterOptions = toml::from_str("type-delay-min = 10").unwrap();
/// assert_eq!(options.type_delay_min, 10);
/// assert_eq!(options.type_delay_max, TypewriterOptions::default().type_delay_max);
/// ```
///
/// Callers are responsible for keeping `min <= max` in each delay pair; the
/// ranges are not validated here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TypewriterOptions {
    /// Initial delay before the first tick when `start()` is called.
    pub type_start_delay: u64,
    /// Minimum delay between typed characters.
    pub type_delay_min: u64,
    /// Maximum delay between typed characters.
    pub type_delay_max: u64,
    /// Fixed pause after a phrase is fully typed, before deleting begins.
    pub type_end_delay: u64,
    /// Minimum delay between deleted characters.
    pub delete_delay_min: u64,
    /// Maximum delay between deleted characters.
    pub delete_delay_max: u64,
    /// Fixed pause after a phrase is fully deleted, before the next phrase.
    pub delete_end_delay: u64,
}

impl TypewriterOptions {
    /// Create options with the default timings.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured start delay as a [`Duration`].
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.type_start_delay)
    }

    /// The fixed pause after typing a full phrase.
    pub fn type_end(&self) -> Duration {
        Duration::from_millis(self.type_end_delay)
    }

    /// The fixed pause after deleting a full phrase.
    pub fn delete_end(&self) -> Duration {
        Duration::from_millis(self.delete_end_delay)
    }
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            type_start_delay: 2000,
            type_delay_min: 100,
            type_delay_max: 200,
            type_end_delay: 1000,
            delete_delay_min: 50,
            delete_delay_max: 100,
            delete_end_delay: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_timings() {
        let options = TypewriterOptions::default();
        assert_eq!(options.type_start_delay, 2000);
        assert_eq!(options.type_delay_min, 100);
        assert_eq!(options.type_delay_max, 200);
        assert_eq!(options.type_end_delay, 1000);
        assert_eq!(options.delete_delay_min, 50);
        assert_eq!(options.delete_delay_max, 100);
        assert_eq!(options.delete_end_delay, 1000);
    }

    #[test]
    fn partial_document_overlays_field_by_field() {
        let options: TypewriterOptions = toml::from_str(
            r#"
            type-start-delay = 0
            delete-delay-max = 75
            "#,
        )
        .unwrap();

        assert_eq!(options.type_start_delay, 0);
        assert_eq!(options.delete_delay_max, 75);
        // Unspecified fields keep their defaults.
        assert_eq!(options.type_delay_min, 100);
        assert_eq!(options.delete_end_delay, 1000);
    }

    #[test]
    fn explicit_zero_is_honored() {
        // A zero in the document must not fall back to the default.
        let options: TypewriterOptions = toml::from_str("type-end-delay = 0").unwrap();
        assert_eq!(options.type_end_delay, 0);
    }

    #[test]
    fn empty_document_yields_defaults() {
        let options: TypewriterOptions = toml::from_str("").unwrap();
        assert_eq!(options, TypewriterOptions::default());
    }
}
