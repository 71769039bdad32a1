//! Configuration merging and precedence handling.

use crate::config::schema::Config;

/// Merges configuration layers field by field.
///
/// # Examples
///
/// ```
/// use cajuhub::config::{Config, ConfigMerger};
///
/// let low = Config { session_ttl_hours: Some(1), ..Default::default() };
/// let high = Config { session_ttl_hours: Some(8), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.session_ttl_hours, Some(8));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge layers given from lowest to highest precedence.
    #[must_use]
    pub fn merge<'a>(layers: impl IntoIterator<Item = &'a Config>) -> Config {
        let mut result = Config::default();
        for layer in layers {
            Self::merge_into(&mut result, layer);
        }
        result
    }

    /// Merge source config into target; every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.session_ttl_hours.is_some() {
            target.session_ttl_hours = source.session_ttl_hours;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.default_list_limit.is_some() {
            target.default_list_limit = source.default_list_limit;
        }
    }
}
