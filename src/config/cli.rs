use crate::app::history::HistoryFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "price-scout")]
#[command(about = "Extract title, price and stock status from product pages")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override storage.database_path
    #[arg(long)]
    pub database: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scrape one product page and save it when the title resolves
    Scrape {
        /// Product page URL
        url: String,

        /// Render through WebDriver instead of a plain HTTP fetch
        #[arg(long)]
        webdriver: bool,
    },
    /// List saved products, newest first
    History {
        #[arg(long, value_enum, default_value_t = HistoryFormat::Table)]
        format: HistoryFormat,
    },
}
