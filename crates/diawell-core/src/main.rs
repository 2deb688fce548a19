use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use diawell_core::app::{self, App, SubmitError};
use diawell_core::AppConfig;
use diawell_scoring::RawInput;
use diawell_store::RecordStore;

mod cli;
use cli::Args;

const DEFAULT_LOG_FILTER: &str =
    "diawell=info,diawell_scoring=info,diawell_store=info,diawell_model=info";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("DIAWELL_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!(target: "diawell", version = env!("CARGO_PKG_VERSION"), "DiaWell starting");

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(db) = args.db {
        config.store.path = db;
    }

    match args.command {
        cli::Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve(config).await
        }
        cli::Command::Assess { fields, no_save } => assess(config, fields, !no_save).await,
        cli::Command::Records => records(config).await,
        cli::Command::ModelInfo => model_info(config),
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    let model = app::load_classifier(&config)?;
    let info = model.info();
    let (store, store_task) = app::open_store(&config)?;

    let app = App::new(Arc::new(model), Some(info), Arc::new(store.clone()))
        .with_model_info_exposed(config.server.expose_model_info);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(target: "diawell", error = %error, "ctrl-c handler failed");
        }
    };
    diawell_core::server::serve(listener, Arc::new(app), shutdown).await?;

    store.shutdown().await?;
    store_task.await?;
    Ok(())
}

async fn assess(config: AppConfig, fields: Vec<(String, String)>, persist: bool) -> Result<()> {
    let model = app::load_classifier(&config)?;
    let (store, store_task) = app::open_store(&config)?;
    let app = App::new(Arc::new(model), None, Arc::new(store.clone()));

    let raw: RawInput = fields.into_iter().collect();
    let outcome = app.submit(&raw, persist).await;

    store.shutdown().await?;
    store_task.await?;

    match outcome {
        Ok(view) => {
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        Err(SubmitError::Assess(err)) => bail!("{err}"),
        Err(err) => Err(err.into()),
    }
}

async fn records(config: AppConfig) -> Result<()> {
    let (store, store_task) = app::open_store(&config)?;
    let listed = store.list_all().await;
    store.shutdown().await?;
    store_task.await?;

    println!("{}", serde_json::to_string_pretty(&listed?)?);
    Ok(())
}

fn model_info(config: AppConfig) -> Result<()> {
    let model = app::load_classifier(&config)?;
    println!("{}", serde_json::to_string_pretty(&model.info())?);
    Ok(())
}
