use std::io::Write;

use {
    anyhow::Result,
    clap::Subcommand,
    configsmith_store::ConfigStore,
    tracing::info,
};

#[derive(Subcommand)]
pub enum AppAction {
    /// List applications.
    List,
    /// Create an application.
    Create { name: String },
    /// Delete an application with all of its environments and items.
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum EnvAction {
    /// List the environments of an application.
    List { app: String },
    /// Create an environment under an existing application.
    Create { app: String, env: String },
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// Print the items of an environment as JSON.
    List { app: String, env: String },
    /// Insert an item or overwrite its value.
    Set {
        app: String,
        env: String,
        key: String,
        value: String,
    },
    /// Delete an item.
    Delete {
        app: String,
        env: String,
        key: String,
    },
}

pub fn handle_apps(store: &dyn ConfigStore, action: AppAction, out: &mut dyn Write) -> Result<()> {
    match action {
        AppAction::List => {
            for app in store.list_apps()? {
                writeln!(out, "{app}")?;
            }
        },
        AppAction::Create { name } => {
            store.create_app(&name)?;
            info!(app = %name, "created application");
        },
        AppAction::Delete { name } => {
            store.delete_app(&name)?;
            info!(app = %name, "deleted application");
        },
    }
    Ok(())
}

pub fn handle_envs(store: &dyn ConfigStore, action: EnvAction, out: &mut dyn Write) -> Result<()> {
    match action {
        EnvAction::List { app } => {
            for env in store.list_envs(&app)? {
                writeln!(out, "{env}")?;
            }
        },
        EnvAction::Create { app, env } => {
            store.create_env(&app, &env)?;
            info!(%app, %env, "created environment");
        },
    }
    Ok(())
}

pub fn handle_items(
    store: &dyn ConfigStore,
    action: ItemAction,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        ItemAction::List { app, env } => {
            let items = store.items(&app, &env)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
        },
        ItemAction::Set {
            app,
            env,
            key,
            value,
        } => {
            let item = store.upsert_item(&app, &env, &key, &value)?;
            info!(%app, %env, key = %item.key, "stored config item");
        },
        ItemAction::Delete { app, env, key } => {
            store.delete_item(&app, &env, &key)?;
            info!(%app, %env, %key, "deleted config item");
        },
    }
    Ok(())
}
