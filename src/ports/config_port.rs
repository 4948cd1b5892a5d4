//! Read-only access to sectioned configuration.

use std::path::PathBuf;

/// Typed lookups over `[section] key = value` settings.
///
/// Numeric and boolean getters fall back to `default` when the key is absent
/// or does not parse; range checks live in config validation.
pub trait ConfigPort {
    /// `None` for missing or blank values.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_string(section, key).map(PathBuf::from)
    }
}
