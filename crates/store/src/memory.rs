use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use {configsmith_substitution::ConfigMapping, tracing::error};

use crate::{
    catalog::{Catalog, ConfigItem},
    error::StoreError,
    lookup::{ConfigLookup, ConfigStore},
};

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    catalog: RwLock<Catalog>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Catalog>, StoreError> {
        self.catalog.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Catalog>, StoreError> {
        self.catalog.write().map_err(|_| StoreError::Poisoned)
    }
}

impl ConfigLookup for MemoryConfigStore {
    fn resolve(&self, app: &str, env: &str) -> ConfigMapping {
        match self.read() {
            Ok(catalog) => catalog.mapping(app, env),
            Err(e) => {
                error!(app, env, error = %e, "config lookup failed");
                ConfigMapping::new()
            },
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn list_apps(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.list_apps())
    }

    fn create_app(&self, name: &str) -> Result<(), StoreError> {
        self.write()?.create_app(name)
    }

    fn delete_app(&self, name: &str) -> Result<(), StoreError> {
        self.write()?.delete_app(name)
    }

    fn list_envs(&self, app: &str) -> Result<Vec<String>, StoreError> {
        self.read()?.list_envs(app)
    }

    fn create_env(&self, app: &str, env: &str) -> Result<(), StoreError> {
        self.write()?.create_env(app, env)
    }

    fn items(&self, app: &str, env: &str) -> Result<Vec<ConfigItem>, StoreError> {
        self.read()?.items(app, env)
    }

    fn upsert_item(
        &self,
        app: &str,
        env: &str,
        key: &str,
        value: &str,
    ) -> Result<ConfigItem, StoreError> {
        self.write()?.upsert_item(app, env, key, value)
    }

    fn delete_item(&self, app: &str, env: &str, key: &str) -> Result<(), StoreError> {
        self.write()?.delete_item(app, env, key)
    }
}
