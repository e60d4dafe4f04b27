//! Dynamic form API server
//!
//! # Usage
//!
//! ```bash
//! # Serve the built-in forms on 0.0.0.0:8000
//! dynform-api
//!
//! # Load extra forms and log as JSON
//! dynform-api --schema-dir ./forms --log-format json --port 9000
//! ```
//!
//! Settings are read from defaults, then the TOML file given by `--config`
//! or `DYNFORM_CONFIG`, then `DYNFORM_*` variables, then these flags.

use anyhow::Context;
use clap::Parser;
use dynform_api::{
    create_router, init_tracing, AppState, LogFormat, SchemaRegistry, ServerConfig,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dynform-api")]
#[command(about = "Serve dynamic form schemas and validate submissions")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "DYNFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory of additional schema files
    #[arg(long)]
    schema_dir: Option<PathBuf>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.schema_dir {
            config.schema_dir = Some(dir);
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    init_tracing(config.log_format, "info,tower_http=debug");

    let mut schemas = SchemaRegistry::builtin().context("building built-in schemas")?;
    if let Some(dir) = &config.schema_dir {
        let loaded = schemas
            .load_dir(dir)
            .with_context(|| format!("loading schemas from {}", dir.display()))?;
        tracing::info!(count = loaded, dir = %dir.display(), "Loaded schema directory");
    }

    let state = AppState::new(schemas).context("registering metrics")?;
    tracing::info!(schemas = ?state.schemas.ids(), "Schema registry ready");

    let router = create_router(state, &config);
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!("Starting Dynamic Form API on {}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}
