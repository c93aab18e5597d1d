//! Command line interface
//!
//! Every command prints one JSON document on stdout. Failures print a JSON
//! error report on stderr and exit with status 1.

use std::path::{Path, PathBuf};

use cacheside_application::ports::registry::{list_cache_providers, list_store_providers};
use cacheside_application::run_in_transaction;
use cacheside_domain::error::{Error, Result};
use cacheside_domain::{CreateUserDto, UpdateUserDto};
use cacheside_infrastructure::config::{AppConfig, ConfigLoader};
use cacheside_infrastructure::logging::init_logging;
use cacheside_infrastructure::{CachesideServices, ServiceBootstrap};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tokio::task::JoinSet;
use tracing::warn;

/// Default number of concurrent readers fired by `probe`
pub const DEFAULT_PROBE_READERS: usize = 32;

/// Command line interface for Cacheside
#[derive(Parser, Debug)]
#[command(name = "cacheside")]
#[command(about = "Cache-aside user access with stampede locking")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Cacheside commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a user
    Create(CreateArgs),

    /// Read a user through the cache
    Get {
        /// User id (24 hex characters)
        id: String,
    },

    /// Patch a user and invalidate its cached snapshot
    Update(UpdateArgs),

    /// Create a user, fire concurrent cold reads and count store loads
    ///
    /// With a working lock the store sees a single load however many
    /// readers there are.
    Probe {
        /// Number of concurrent readers
        #[arg(long, default_value_t = DEFAULT_PROBE_READERS)]
        readers: usize,
    },

    /// List registered cache and store providers
    Providers,
}

/// Arguments of `create`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    /// External user identifier
    #[arg(long)]
    pub user_id: String,

    /// Contact email
    #[arg(long)]
    pub email: String,

    /// Consumer the user belongs to
    #[arg(long)]
    pub consumer_id: String,

    /// Key issued to the user
    #[arg(long)]
    pub key_id: String,

    /// Create inside a store transaction (mongo store only)
    #[arg(long)]
    pub transactional: bool,
}

/// Arguments of `update`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UpdateArgs {
    /// User id (24 hex characters)
    pub id: String,

    /// New contact email
    #[arg(long)]
    pub email: Option<String>,

    /// Set the last sign-in time to now
    #[arg(long)]
    pub signed_in_now: bool,

    /// Set the cheater flag
    #[arg(long)]
    pub cheater: Option<bool>,
}

impl CreateArgs {
    fn dto(&self) -> CreateUserDto {
        CreateUserDto {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            consumer_id: self.consumer_id.clone(),
            key_id: self.key_id.clone(),
        }
    }
}

impl UpdateArgs {
    fn patch(&self) -> UpdateUserDto {
        UpdateUserDto {
            email: self.email.clone(),
            signed_in: self.signed_in_now.then(Utc::now),
            is_cheater: self.cheater,
            ..UpdateUserDto::default()
        }
    }
}

/// Run a parsed command line: load config, start logging, bootstrap, execute
pub async fn run(cli: Cli) -> anyhow::Result<Value> {
    if cli.command == Command::Providers {
        return Ok(providers_report());
    }

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.logging)?;

    let services = ServiceBootstrap::new(config).build().await?;
    Ok(execute(cli.command, &services).await?)
}

/// Load configuration, optionally from an explicit file
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load()?)
}

/// Run one command against ready services
pub async fn execute(command: Command, services: &CachesideServices) -> Result<Value> {
    match command {
        Command::Create(args) => create(&args, services).await,
        Command::Get { id } => Ok(serde_json::to_value(services.users.find_one(&id).await?)?),
        Command::Update(args) => {
            let patch = args.patch();
            if patch.is_empty() {
                return Err(Error::invalid_argument(
                    "nothing to update: pass --email, --signed-in-now or --cheater",
                ));
            }
            Ok(serde_json::to_value(
                services.users.update(&args.id, patch).await?,
            )?)
        }
        Command::Probe { readers } => probe(readers, services).await,
        Command::Providers => Ok(providers_report()),
    }
}

async fn create(args: &CreateArgs, services: &CachesideServices) -> Result<Value> {
    let user = if args.transactional {
        let manager = services.transactions.as_ref().ok_or_else(|| {
            Error::invalid_argument("the configured store does not support transactions")
        })?;
        let users = services.users.clone();
        let dto = args.dto();
        run_in_transaction(manager.as_ref(), |ctx| async move {
            users.create_in(dto, Some(&ctx)).await
        })
        .await?
    } else {
        services.users.create(args.dto()).await?
    };
    Ok(serde_json::to_value(user)?)
}

async fn probe(readers: usize, services: &CachesideServices) -> Result<Value> {
    if readers == 0 {
        return Err(Error::invalid_argument("probe needs at least one reader"));
    }

    let stamp = Utc::now().timestamp_millis();
    let user = services
        .users
        .create(CreateUserDto {
            user_id: format!("probe-{stamp}"),
            email: format!("probe-{stamp}@cacheside.invalid"),
            consumer_id: "probe".to_string(),
            key_id: "probe".to_string(),
        })
        .await?;
    services.reset_store_calls();

    let mut tasks = JoinSet::new();
    for _ in 0..readers {
        let users = services.users.clone();
        let id = user.id.clone();
        tasks.spawn(async move { users.find_one(&id).await });
    }

    let mut succeeded = 0_usize;
    let mut failed = 0_usize;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(_)) => succeeded += 1,
            Ok(Err(error)) => {
                warn!(error = %error, "Probe read failed");
                failed += 1;
            }
            Err(join_error) => {
                return Err(Error::internal(format!("probe reader died: {join_error}")));
            }
        }
    }

    Ok(json!({
        "id": user.id,
        "readers": readers,
        "succeeded": succeeded,
        "failed": failed,
        "storeLoads": services.store_calls().loads,
    }))
}

/// Registered providers as JSON
pub fn providers_report() -> Value {
    let entries = |list: Vec<(&'static str, &'static str)>| -> Vec<Value> {
        list.into_iter()
            .map(|(name, description)| json!({ "name": name, "description": description }))
            .collect()
    };
    json!({
        "cache": entries(list_cache_providers()),
        "store": entries(list_store_providers()),
    })
}

/// Short class name of an error, as printed in reports
pub fn error_class(error: &Error) -> &'static str {
    match error {
        Error::NotFound { .. } => "not_found",
        Error::InvalidArgument { .. } => "invalid_argument",
        Error::Conflict { .. } => "conflict",
        Error::LockContention { .. } => "lock_contention",
        Error::Configuration { .. } => "configuration",
        _ => "internal",
    }
}

/// JSON error report for a failed command
pub fn error_report(error: &anyhow::Error) -> Value {
    match error.downcast_ref::<Error>() {
        Some(domain) => json!({
            "error": error_class(domain),
            "status": domain.status_code(),
            "message": domain.to_string(),
        }),
        None => json!({
            "error": "internal",
            "status": 500,
            "message": format!("{error:#}"),
        }),
    }
}
