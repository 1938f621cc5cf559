mod store_commands;

use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    configsmith_config::ConfigsmithConfig,
    configsmith_service::{CONTENT_TYPE, SubstitutionService},
    configsmith_store::{FileConfigStore, Scope},
    store_commands::{AppAction, EnvAction, ItemAction},
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "configsmith",
    version,
    about = "Per-environment configuration store and JSON templating"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of discovering one.
    #[arg(long, global = true, env = "CONFIGSMITH_CONFIG")]
    config: Option<PathBuf>,

    /// Store file. Overrides `store.path` from the config.
    #[arg(long, global = true, env = "CONFIGSMITH_STORE")]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Substitute a scope's configuration into a JSON template.
    Render {
        #[arg(long)]
        app: String,
        #[arg(long)]
        env: String,
        /// Template file; `-` or omitted reads stdin.
        #[arg(long)]
        template: Option<PathBuf>,
        /// Exit with an error when any placeholder is left unresolved.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Application management.
    Apps {
        #[command(subcommand)]
        action: AppAction,
    },
    /// Environment management.
    Envs {
        #[command(subcommand)]
        action: EnvAction,
    },
    /// Config item management.
    Items {
        #[command(subcommand)]
        action: ItemAction,
    },
}

fn init_telemetry(cli: &Cli, config: &ConfigsmithConfig) {
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries rendered documents; logs go to stderr.
    if cli.json_logs || config.logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ConfigsmithConfig> {
    match &cli.config {
        Some(path) => configsmith_config::load_config(path),
        None => Ok(configsmith_config::discover_and_load()),
    }
}

fn read_template(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display())),
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read template from stdin")?;
            Ok(raw)
        },
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_telemetry(&cli, &config);

    debug!(version = env!("CARGO_PKG_VERSION"), "configsmith starting");

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.store.resolved_path());
    let store = FileConfigStore::open(&store_path)
        .with_context(|| format!("failed to open store {}", store_path.display()))?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Render {
            app,
            env,
            template,
            strict,
        } => {
            let raw = read_template(template.as_deref())?;
            let service = SubstitutionService::new(store, config.substitution);
            let rendered = service.render(&app, &env, &raw);
            writeln!(stdout, "{}", rendered.output)?;
            if let Some(report) = rendered.report() {
                info!(
                    scope = %Scope::new(app, env),
                    resolved = report.resolved().count(),
                    content_type = CONTENT_TYPE,
                    "rendered template"
                );
                let unresolved = report.unresolved().count();
                if strict && unresolved > 0 {
                    anyhow::bail!("{unresolved} placeholder(s) left unresolved");
                }
            }
            Ok(())
        },
        Commands::Apps { action } => store_commands::handle_apps(&store, action, &mut stdout),
        Commands::Envs { action } => store_commands::handle_envs(&store, action, &mut stdout),
        Commands::Items { action } => store_commands::handle_items(&store, action, &mut stdout),
    }
}
