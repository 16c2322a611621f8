mod catalog;
mod commands;
mod config;
mod diagnostics;
mod error;
mod index;
mod labels;
mod logging;
mod normalize;
mod parser;
mod permalink;
mod resolver;
mod search;
mod session;
mod snippet;
mod source;
mod types;
mod xml;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "uscnav", about = "Browse, cite, and search the United States Code from USLM XML")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Library root holding `.uscnav.toml`, the catalog, and the XML files.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Log debug events to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Rebuild the title catalog from the XML directory
    Catalog,
    /// Print a shareable link to a title or section
    Link {
        /// Title number, e.g. `5` or `Title 5`
        title: String,
        /// Section number or identifier
        section: Option<String>,
        /// Base URL the link parameters are added to
        #[arg(long, default_value = commands::DEFAULT_LINK_BASE)]
        base: String,
    },
    /// Show the title and section a link points at
    Open {
        /// Link or bare query string, e.g. `?t=5&s=101`
        url: String,
    },
    /// Search section text across all titles
    Search {
        /// Keyword or phrase, matched case-insensitively
        query: String,
        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a title overview, or a section by number or identifier
    Show {
        /// Title number, e.g. `5` or `Title 5`
        title: String,
        /// Section number (`101`, `§ 101.`) or identifier (`/us/usc/t5/s101`)
        section: Option<String>,
    },
    /// List the titles in the catalog
    Titles,
    /// Print a title's table of contents
    Toc {
        /// Title number, e.g. `5` or `Title 5`
        title: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let root = cli.root.as_path();

    let result = match &cli.command {
        Commands::Catalog => commands::catalog(root),
        Commands::Link { base, section, title } => commands::link(root, title, section.as_deref(), base),
        Commands::Open { url } => commands::open(root, url),
        Commands::Search { json, query } => commands::search(root, query, *json),
        Commands::Show { section, title } => commands::show(root, title, section.as_deref()),
        Commands::Titles => commands::titles(root),
        Commands::Toc { title } => commands::toc(root, title),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
        Ok(code) => code,
    };
}
