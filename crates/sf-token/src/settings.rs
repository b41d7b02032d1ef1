//! Token service settings loaded from JSON.
//!
//! Settings mirror the option bag a service is configured with. Collaborators
//! are named rather than passed as functions, and resolved through a
//! [`CollaboratorRegistry`]. Every field stays a raw JSON value so that a
//! wrongly typed setting is reported with the same error kind as a wrongly
//! built service, not as a parse failure.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sf_token_core::{Result, TokenError};

use crate::clock::{Clock, SystemClock};
use crate::id::{IdGenerator, ObjectIdGenerator, RandomIdGenerator};

/// Raw settings for a [`TokenService`](crate::TokenService).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettings {
    /// Shared secret mixed into every hash. Must be a string.
    #[serde(default)]
    pub secret: Option<Value>,

    /// Name of the id generator to use. Required.
    #[serde(default)]
    pub unique_id: Option<Value>,

    /// Name of the clock to use. Defaults to the system clock.
    #[serde(default)]
    pub time: Option<Value>,

    /// Hash algorithm name. Defaults to `sha256`.
    #[serde(default)]
    pub algorithm: Option<Value>,
}

impl TokenSettings {
    /// Parse settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TokenError::Settings(e.to_string()))
    }

    /// Read and parse settings from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| TokenError::Settings(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }
}

/// Named collaborators that settings can refer to.
///
/// The default registry knows the `object-id` and `random` id generators and
/// the `system` clock.
#[derive(Clone)]
pub struct CollaboratorRegistry {
    id_generators: HashMap<String, Arc<dyn IdGenerator>>,
    clocks: HashMap<String, Arc<dyn Clock>>,
}

impl CollaboratorRegistry {
    /// A registry with no collaborators at all.
    pub fn empty() -> Self {
        Self {
            id_generators: HashMap::new(),
            clocks: HashMap::new(),
        }
    }

    pub fn register_id_generator(
        &mut self,
        name: impl Into<String>,
        generator: impl IdGenerator + 'static,
    ) -> &mut Self {
        self.id_generators.insert(name.into(), Arc::new(generator));
        self
    }

    pub fn register_clock(&mut self, name: impl Into<String>, clock: impl Clock + 'static) -> &mut Self {
        self.clocks.insert(name.into(), Arc::new(clock));
        self
    }

    pub fn id_generator(&self, name: &str) -> Option<Arc<dyn IdGenerator>> {
        self.id_generators.get(name).cloned()
    }

    pub fn clock(&self, name: &str) -> Option<Arc<dyn Clock>> {
        self.clocks.get(name).cloned()
    }
}

impl Default for CollaboratorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register_id_generator("object-id", ObjectIdGenerator::new())
            .register_id_generator("random", RandomIdGenerator)
            .register_clock("system", SystemClock);
        registry
    }
}

impl fmt::Debug for CollaboratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut id_generators: Vec<_> = self.id_generators.keys().collect();
        let mut clocks: Vec<_> = self.clocks.keys().collect();
        id_generators.sort();
        clocks.sort();
        f.debug_struct("CollaboratorRegistry")
            .field("id_generators", &id_generators)
            .field("clocks", &clocks)
            .finish()
    }
}

/// Display form of a setting that was not a usable name.
pub(crate) fn setting_name(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_full_settings() {
        let settings = TokenSettings::from_json_str(
            r#"{"secret":"mysecret","uniqueId":"object-id","time":"system","algorithm":"md5"}"#,
        )
        .unwrap();
        assert_eq!(settings.secret, Some(json!("mysecret")));
        assert_eq!(settings.unique_id, Some(json!("object-id")));
        assert_eq!(settings.time, Some(json!("system")));
        assert_eq!(settings.algorithm, Some(json!("md5")));
    }

    #[test]
    fn test_parse_keeps_wrong_types() {
        let settings = TokenSettings::from_json_str(r#"{"secret":1664}"#).unwrap();
        assert_eq!(settings.secret, Some(json!(1664)));
        assert!(settings.unique_id.is_none());
    }

    #[test]
    fn test_malformed_json() {
        let err = TokenSettings::from_json_str("{not json").unwrap_err();
        assert_eq!(err.code(), "E_SETTINGS");
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"secret":"guestwhat","uniqueId":"random"}}"#).unwrap();

        let settings = TokenSettings::from_path(file.path()).unwrap();
        assert_eq!(settings.secret, Some(json!("guestwhat")));
        assert_eq!(settings.unique_id, Some(json!("random")));
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = TokenSettings::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, TokenError::Settings(_)));
    }

    #[test]
    fn test_default_registry() {
        let registry = CollaboratorRegistry::default();
        assert!(registry.id_generator("object-id").is_some());
        assert!(registry.id_generator("random").is_some());
        assert!(registry.id_generator("id").is_none());
        assert!(registry.clock("system").is_some());
        assert!(registry.clock("time").is_none());
    }

    #[test]
    fn test_register_custom() {
        let mut registry = CollaboratorRegistry::empty();
        registry
            .register_id_generator("fixed", || "abc".to_string())
            .register_clock("frozen", || 42i64);

        assert_eq!(registry.id_generator("fixed").unwrap().generate(), "abc");
        assert_eq!(registry.clock("frozen").unwrap().now_millis(), 42);
    }
}
