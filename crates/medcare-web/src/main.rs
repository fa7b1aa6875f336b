//! `medcare`: serves the hospital intake screens.
//!
//! Settings come from an optional TOML file overridden by `MEDCARE_*`
//! variables (`MEDCARE_PORT=9000`, `MEDCARE_STORE_PATH=~/medcare.db`, ...).
//! Without `auth_password_hash` the demo login `admin` / `admin123` applies;
//! `medcare --hash-password` prints a value for that key.

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use medcare_store_sqlite::SqliteStore;
use medcare_web::{AppState, ServerConfig};
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "MedCare hospital management server")]
struct Cli {
  /// TOML settings file; missing is not an error.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 PHC string, and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  if cli.hash_password {
    return print_password_hash();
  }

  let cfg = load_config(&cli.config)?;
  let state = build_state(&cfg).await?;

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(system = %cfg.system_name, "serving on http://{address}");

  axum::serve(listener, medcare_web::router(state))
    .await
    .context("server error")
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("MEDCARE"))
    .build()
    .and_then(config::Config::try_deserialize)
    .with_context(|| format!("invalid configuration (file {})", path.display()))
}

async fn build_state(cfg: &ServerConfig) -> anyhow::Result<AppState<SqliteStore>> {
  let gate = cfg
    .session_gate()
    .map_err(|e| anyhow::anyhow!("auth_password_hash is not a PHC string: {e}"))?;
  if cfg.auth_password_hash.is_none() {
    tracing::warn!("auth_password_hash unset, demo login admin / admin123 is active");
  }

  let store_path = expand_home(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("cannot open patient store {}", store_path.display()))?;
  tracing::info!(path = %store_path.display(), "patient store ready");

  Ok(AppState {
    store:  Arc::new(store),
    gate:   Arc::new(gate),
    config: Arc::new(cfg.clone()),
  })
}

fn print_password_hash() -> anyhow::Result<()> {
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\n', '\r']);

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
  println!("{hash}");
  Ok(())
}

/// `~/x` becomes `$HOME/x`; anything else is returned unchanged.
fn expand_home(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
