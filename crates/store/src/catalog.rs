use std::collections::BTreeMap;

use {
    configsmith_substitution::ConfigMapping,
    serde::{Deserialize, Serialize},
};

use crate::error::StoreError;

/// Longest accepted config key, in characters.
pub const KEY_MAX_LEN: usize = 450;

/// A single key/value item within an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub items: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub environments: BTreeMap<String, Environment>,
}

/// Every application, environment and item a store holds.
///
/// Deleting an application drops its environments and their items with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub apps: BTreeMap<String, Application>,
}

/// Application, environment and key names are compared after trimming, at
/// every entry point.
fn normalize(name: &str) -> &str {
    name.trim()
}

fn require_name<'n>(kind: &'static str, name: &'n str) -> Result<&'n str, StoreError> {
    let name = normalize(name);
    if name.is_empty() {
        return Err(StoreError::InvalidName { kind });
    }
    Ok(name)
}

impl Catalog {
    /// Flat mapping for a scope; empty when the scope is unknown.
    pub fn mapping(&self, app: &str, env: &str) -> ConfigMapping {
        self.environment(app, env)
            .map(|e| {
                e.items
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn list_apps(&self) -> Vec<String> {
        self.apps.keys().cloned().collect()
    }

    pub fn create_app(&mut self, name: &str) -> Result<(), StoreError> {
        let name = require_name("application", name)?;
        if self.apps.contains_key(name) {
            return Err(StoreError::AppExists(name.to_string()));
        }
        self.apps.insert(name.to_string(), Application::default());
        Ok(())
    }

    pub fn delete_app(&mut self, name: &str) -> Result<(), StoreError> {
        let name = normalize(name);
        self.apps
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::AppNotFound(name.to_string()))
    }

    pub fn list_envs(&self, app: &str) -> Result<Vec<String>, StoreError> {
        let app = normalize(app);
        let application = self
            .apps
            .get(app)
            .ok_or_else(|| StoreError::AppNotFound(app.to_string()))?;
        Ok(application.environments.keys().cloned().collect())
    }

    pub fn create_env(&mut self, app: &str, env: &str) -> Result<(), StoreError> {
        let app = normalize(app);
        let env = require_name("environment", env)?;
        let application = self
            .apps
            .get_mut(app)
            .ok_or_else(|| StoreError::AppNotFound(app.to_string()))?;
        if application.environments.contains_key(env) {
            return Err(StoreError::EnvExists {
                app: app.to_string(),
                env: env.to_string(),
            });
        }
        application
            .environments
            .insert(env.to_string(), Environment::default());
        Ok(())
    }

    /// Items of an environment sorted by key.
    pub fn items(&self, app: &str, env: &str) -> Result<Vec<ConfigItem>, StoreError> {
        let environment = self.environment(app, env).ok_or_else(|| self.missing(app, env))?;
        Ok(environment
            .items
            .iter()
            .map(|(key, value)| ConfigItem {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    /// Insert a new item or overwrite the value of an existing one.
    pub fn upsert_item(
        &mut self,
        app: &str,
        env: &str,
        key: &str,
        value: &str,
    ) -> Result<ConfigItem, StoreError> {
        let key = require_name("config key", key)?;
        if key.chars().count() > KEY_MAX_LEN {
            return Err(StoreError::KeyTooLong { max: KEY_MAX_LEN });
        }
        let missing = self.missing(app, env);
        let environment = self.environment_mut(app, env).ok_or(missing)?;
        environment.items.insert(key.to_string(), value.to_string());
        Ok(ConfigItem {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn delete_item(&mut self, app: &str, env: &str, key: &str) -> Result<(), StoreError> {
        let key = normalize(key);
        let missing = self.missing(app, env);
        let environment = self.environment_mut(app, env).ok_or(missing)?;
        environment
            .items
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::ItemNotFound {
                app: normalize(app).to_string(),
                env: normalize(env).to_string(),
                key: key.to_string(),
            })
    }

    fn environment(&self, app: &str, env: &str) -> Option<&Environment> {
        self.apps
            .get(normalize(app))?
            .environments
            .get(normalize(env))
    }

    fn environment_mut(&mut self, app: &str, env: &str) -> Option<&mut Environment> {
        self.apps
            .get_mut(normalize(app))?
            .environments
            .get_mut(normalize(env))
    }

    /// The most specific "not found" error for a scope.
    fn missing(&self, app: &str, env: &str) -> StoreError {
        let (app, env) = (normalize(app), normalize(env));
        if self.apps.contains_key(app) {
            StoreError::EnvNotFound {
                app: app.to_string(),
                env: env.to_string(),
            }
        } else {
            StoreError::AppNotFound(app.to_string())
        }
    }
}
