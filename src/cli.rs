//! CLI definitions for pdpwriter.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pdpwriter CLI.
#[derive(Parser)]
#[command(name = "pdpwriter")]
#[command(about = "Rewrite product-detail-page copy with an LLM, in place")]
#[command(version)]
pub(crate) struct Cli {
    /// Alternate defaults template (TOML)
    #[arg(long, global = true, env = "PDPWRITER_DEFAULTS")]
    pub defaults: Option<PathBuf>,

    /// Directory holding settings.json and logs (default: ~/.pdpwriter)
    #[arg(long, global = true, env = "PDPWRITER_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Address of the page, sent to the model with the scraped fields
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scrape, rewrite and write the new copy back into the page
    Apply {
        /// Saved product page (HTML)
        file: PathBuf,

        /// Where to write the rewritten page (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scrape and rewrite without modifying the page
    Preview {
        /// Saved product page (HTML)
        file: PathBuf,
    },

    /// Print the fields scraped from a page
    Scrape {
        /// Saved product page (HTML)
        file: PathBuf,
    },

    /// Show the current mode badge
    Status,

    /// Check that the background worker answers
    Ping,

    /// Show or change saved settings
    Settings {
        /// API key for the chat completions endpoint
        #[arg(long)]
        api_key: Option<String>,

        /// Model name (empty resets to the default)
        #[arg(long)]
        model: Option<String>,

        /// Use mock mode: no API calls
        #[arg(long, conflicts_with = "live")]
        mock: bool,

        /// Use live mode
        #[arg(long)]
        live: bool,

        /// Print the saved settings
        #[arg(long)]
        show: bool,
    },
}
