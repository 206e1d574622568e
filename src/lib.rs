pub mod analyze;
pub mod classify;
pub mod cli;
pub mod env_convert;
pub mod generate;
pub mod infer;
pub mod input;
pub mod io_utils;
pub mod migration;
pub mod model;
pub mod schema;
pub mod sql;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("schema_tools", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command: {:?}", cli.command);
    match cli.command {
        Commands::Analyze(args) => analyze::execute(&args),
        Commands::Migration(args) => generate::execute_migration(&args),
        Commands::Model(args) => generate::execute_model(&args),
        Commands::Sql(args) => generate::execute_sql(&args),
        Commands::Generate(args) => generate::execute(&args),
        Commands::EnvConvert(args) => env_convert::execute(&args),
    }
}
