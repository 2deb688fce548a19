use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "diawell", version, about = "Diabetes risk screening service")]
pub struct Args {
    /// Config file; defaults to ./diawell.toml when present.
    #[arg(long, global = true, env = "DIAWELL_CONFIG")]
    pub config: Option<PathBuf>,
    /// Model artifact, overrides `model.path`.
    #[arg(long, global = true, env = "DIAWELL_MODEL")]
    pub model: Option<PathBuf>,
    /// SQLite database, overrides `store.path`.
    #[arg(long, global = true, env = "DIAWELL_DB")]
    pub db: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the intake form and JSON endpoints.
    Serve {
        /// Overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Score one submission and print the result as JSON.
    Assess {
        /// Form field, e.g. `--field glucose=180`. Repeatable.
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,
        #[arg(long, default_value_t = false)]
        no_save: bool,
    },
    /// Print stored records, most recent first.
    Records,
    /// Print the loaded model's parameters.
    ModelInfo,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty field name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
