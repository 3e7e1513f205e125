use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use palli_server::{AppState, ServerConfig, session};
use palli_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Palli school records server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "palli.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PALLI").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.session_file = expand_tilde(&server_cfg.session_file);

  // Seed the store.
  let store = match &server_cfg.seed_path {
    Some(path) => {
      let path = expand_tilde(path);
      MemoryStore::open(&path)
        .await
        .with_context(|| format!("failed to load seed from {path:?}"))?
    }
    None => {
      tracing::info!("no seed_path configured, starting with the demo school");
      MemoryStore::demo().context("bundled demo seed is invalid")?
    }
  };

  let roles = session::RoleFile::new(server_cfg.session_file.clone());
  let restored = session::restore(&roles)
    .await
    .context("failed to restore session")?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = palli_server::router(AppState::new(store, server_cfg, restored));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
