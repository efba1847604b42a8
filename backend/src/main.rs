//! Application entry-point: wires configuration, persistence, the identity
//! provider, and the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use clap::Parser;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use catalog_backend::inbound::http::state::HttpState;
use catalog_backend::outbound::google::{ClientSecrets, GoogleIdentityProvider};
use catalog_backend::outbound::persistence::{
    DbPool, DieselCategoryRepository, DieselItemRepository, DieselUserRepository, PoolConfig,
};
use catalog_backend::server::{create_server, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "catalog-backend", about = "Catalog web application")]
struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// SQLite database location.
    #[arg(long, env = "DATABASE_URL", default_value = "catalog.db")]
    database_url: String,

    /// OAuth2 client credential file.
    #[arg(long, env = "CLIENT_SECRETS_FILE", default_value = "client_secrets.json")]
    client_secrets: PathBuf,
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let secrets = ClientSecrets::load(&cli.client_secrets)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let pool = DbPool::new(&PoolConfig::new(&cli.database_url))
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    pool.run_migrations()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!(database_url = %cli.database_url, "database ready");

    let state = HttpState {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        categories: Arc::new(DieselCategoryRepository::new(pool.clone())),
        items: Arc::new(DieselItemRepository::new(pool)),
        identity: Arc::new(GoogleIdentityProvider::new(&secrets.web)),
        client_id: secrets.web.client_id.clone(),
    };

    let server = create_server(ServerConfig::new(
        key,
        cookie_secure,
        SameSite::Lax,
        cli.bind,
        state,
    ))?;
    info!(bind = %cli.bind, "server started");
    server.await
}
