use std::{fmt, sync::Arc};

use {configsmith_substitution::ConfigMapping, serde::Serialize};

use crate::{catalog::ConfigItem, error::StoreError};

/// An (application, environment) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Scope {
    pub app: String,
    pub env: String,
}

impl Scope {
    pub fn new(app: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            env: env.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.app, self.env)
    }
}

/// Read side used by substitution: resolve a scope to its flat mapping.
///
/// Unknown applications or environments resolve to an empty mapping, never
/// an error. The returned mapping is a snapshot owned by the caller.
pub trait ConfigLookup: Send + Sync {
    fn resolve(&self, app: &str, env: &str) -> ConfigMapping;
}

impl<T: ConfigLookup + ?Sized> ConfigLookup for Arc<T> {
    fn resolve(&self, app: &str, env: &str) -> ConfigMapping {
        (**self).resolve(app, env)
    }
}

impl<T: ConfigLookup + ?Sized> ConfigLookup for &T {
    fn resolve(&self, app: &str, env: &str) -> ConfigMapping {
        (**self).resolve(app, env)
    }
}

/// Management side: applications, environments and items.
pub trait ConfigStore: ConfigLookup {
    fn list_apps(&self) -> Result<Vec<String>, StoreError>;
    fn create_app(&self, name: &str) -> Result<(), StoreError>;
    /// Removes the application with all of its environments and items.
    fn delete_app(&self, name: &str) -> Result<(), StoreError>;

    fn list_envs(&self, app: &str) -> Result<Vec<String>, StoreError>;
    fn create_env(&self, app: &str, env: &str) -> Result<(), StoreError>;

    fn items(&self, app: &str, env: &str) -> Result<Vec<ConfigItem>, StoreError>;
    fn upsert_item(
        &self,
        app: &str,
        env: &str,
        key: &str,
        value: &str,
    ) -> Result<ConfigItem, StoreError>;
    fn delete_item(&self, app: &str, env: &str, key: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl ConfigLookup for Fixed {
        fn resolve(&self, app: &str, env: &str) -> ConfigMapping {
            ConfigMapping::from([("scope".to_string(), format!("{app}/{env}"))])
        }
    }

    #[test]
    fn scope_display() {
        assert_eq!(Scope::new("billing", "prod").to_string(), "billing/prod");
    }

    #[test]
    fn lookup_through_arc_and_ref() {
        let shared: Arc<dyn ConfigLookup> = Arc::new(Fixed);
        assert_eq!(shared.resolve("a", "b")["scope"], "a/b");
        let borrowed = &Fixed;
        assert_eq!(borrowed.resolve("c", "d")["scope"], "c/d");
    }
}
