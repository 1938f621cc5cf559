use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use {
    configsmith_substitution::ConfigMapping,
    tempfile::NamedTempFile,
    tracing::{debug, error},
};

use crate::{
    catalog::{Catalog, ConfigItem},
    error::StoreError,
    lookup::{ConfigLookup, ConfigStore},
};

/// JSON file-backed store. Every successful mutation is written through
/// before it becomes visible to readers.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    catalog: Mutex<Catalog>,
}

impl FileConfigStore {
    /// Load the store at `path`, or start empty if the file does not exist
    /// yet. The file is only created by the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let catalog = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Catalog::default()
        };
        debug!(path = %path.display(), apps = catalog.apps.len(), "opened config store");
        Ok(Self {
            path,
            catalog: Mutex::new(catalog),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Catalog>, StoreError> {
        self.catalog.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Apply `f` to a copy of the catalog, persist it, then publish it.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Catalog) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut current = self.lock()?;
        let mut next = current.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *current = next;
        Ok(out)
    }

    /// Write the catalog to a temp file beside the store and rename it over
    /// the store, so readers see either the old file or the new one.
    fn persist(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(catalog)?;

        // Values are often credentials; temp files are created 0600 on unix.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "saved config store");
        Ok(())
    }
}

impl ConfigLookup for FileConfigStore {
    fn resolve(&self, app: &str, env: &str) -> ConfigMapping {
        match self.lock() {
            Ok(catalog) => catalog.mapping(app, env),
            Err(e) => {
                error!(app, env, error = %e, "config lookup failed");
                ConfigMapping::new()
            },
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn list_apps(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.list_apps())
    }

    fn create_app(&self, name: &str) -> Result<(), StoreError> {
        self.mutate(|c| c.create_app(name))
    }

    fn delete_app(&self, name: &str) -> Result<(), StoreError> {
        self.mutate(|c| c.delete_app(name))
    }

    fn list_envs(&self, app: &str) -> Result<Vec<String>, StoreError> {
        self.lock()?.list_envs(app)
    }

    fn create_env(&self, app: &str, env: &str) -> Result<(), StoreError> {
        self.mutate(|c| c.create_env(app, env))
    }

    fn items(&self, app: &str, env: &str) -> Result<Vec<ConfigItem>, StoreError> {
        self.lock()?.items(app, env)
    }

    fn upsert_item(
        &self,
        app: &str,
        env: &str,
        key: &str,
        value: &str,
    ) -> Result<ConfigItem, StoreError> {
        self.mutate(|c| c.upsert_item(app, env, key, value))
    }

    fn delete_item(&self, app: &str, env: &str, key: &str) -> Result<(), StoreError> {
        self.mutate(|c| c.delete_item(app, env, key))
    }
}
