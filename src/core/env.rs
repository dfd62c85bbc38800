//! Environment lookups.
//!
//! Substitution reads values through [`EnvSource`] so the process
//! environment can be swapped for a seeded map in tests, and so
//! program-controlled bindings like `IMAGE_TAG` never have to be written
//! into the real process environment.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

/// Read-only key/value lookup for substitution.
pub trait EnvSource {
    /// Value bound to `name`, or `None` when unset.
    fn get(&self, name: &str) -> Option<Zeroizing<String>>;
}

/// The real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<Zeroizing<String>> {
        if name.is_empty() {
            return None;
        }
        std::env::var(name).ok().map(Zeroizing::new)
    }
}

/// A fixed map of bindings.
#[derive(Debug, Default, Clone)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, replacing any previous value.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<Zeroizing<String>> {
        self.vars.get(name).cloned().map(Zeroizing::new)
    }
}

/// Program-controlled bindings layered over a base source.
///
/// Overrides win over the base.
pub struct Overlay<'a, E: EnvSource + ?Sized> {
    base: &'a E,
    overrides: MapEnv,
}

impl<'a, E: EnvSource + ?Sized> Overlay<'a, E> {
    pub fn new(base: &'a E) -> Self {
        Self {
            base,
            overrides: MapEnv::new(),
        }
    }

    pub fn bind(mut self, name: &str, value: &str) -> Self {
        self.overrides.set(name, value);
        self
    }
}

impl<E: EnvSource + ?Sized> EnvSource for Overlay<'_, E> {
    fn get(&self, name: &str) -> Option<Zeroizing<String>> {
        self.overrides.get(name).or_else(|| self.base.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().with("DB_URL", "postgres://x");
        assert_eq!(env.get("DB_URL").as_deref().map(String::as_str), Some("postgres://x"));
        assert!(env.get("MISSING").is_none());
    }

    #[test]
    fn test_overlay_wins_over_base() {
        let base = MapEnv::new().with("IMAGE_TAG", "stale").with("OTHER", "kept");
        let overlay = Overlay::new(&base).bind("IMAGE_TAG", "1.2.3");
        assert_eq!(overlay.get("IMAGE_TAG").unwrap().as_str(), "1.2.3");
        assert_eq!(overlay.get("OTHER").unwrap().as_str(), "kept");
    }

    #[test]
    fn test_process_env_empty_name_is_unset() {
        assert!(ProcessEnv.get("").is_none());
    }

    #[test]
    fn test_from_iter() {
        let env: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(env.get("B").unwrap().as_str(), "2");
    }
}
