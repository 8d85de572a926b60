//! notemark CLI - Markdown to note-service block conversion and page tooling.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use notemark::{
    markdown_to_request, page_title, Api, BuildOptions, CellPolicy, HttpTransport, SearchQuery,
};

#[derive(Parser)]
#[command(name = "notemark")]
#[command(version)]
#[command(about = "Convert Markdown to note-service blocks and read pages back", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Markdown to wire-block JSON
    Convert {
        /// Input Markdown file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Table cell whitespace policy
        #[arg(long, value_enum, default_value = "trim")]
        cells: CellMode,

        /// Block id to insert after (appends to the end if omitted)
        #[arg(long, value_name = "BLOCK_ID")]
        after: Option<String>,

        /// Compact (single-line) JSON
        #[arg(long)]
        compact: bool,
    },

    /// Read a page's text content, recursing into sub-pages
    Read {
        /// Page id to read
        #[arg(value_name = "PAGE_ID")]
        page_id: String,

        /// API integration token
        #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Append Markdown content to a page
    Append {
        /// Page id to append into
        #[arg(value_name = "PAGE_ID")]
        page_id: String,

        /// Input Markdown file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Block id to insert after (appends to the end if omitted)
        #[arg(long, value_name = "BLOCK_ID")]
        after: Option<String>,

        /// API integration token
        #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Search pages and databases shared with the integration
    Search {
        /// Text to search for
        #[arg(value_name = "QUERY")]
        query: String,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,

        /// API integration token
        #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: String,
    },
}

/// Table cell whitespace handling.
#[derive(Clone, Copy, ValueEnum)]
enum CellMode {
    /// Trim surrounding whitespace from each cell
    Trim,
    /// Keep cell text verbatim
    Preserve,
}

impl From<CellMode> for CellPolicy {
    fn from(mode: CellMode) -> Self {
        match mode {
            CellMode::Trim => CellPolicy::Trim,
            CellMode::Preserve => CellPolicy::Preserve,
        }
    }
}

fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), err);
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("  {} {}", "caused by:".red(), cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> notemark::Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            cells,
            after,
            compact,
        } => {
            let markdown = read_input(input.as_deref())?;
            let options = BuildOptions::new().with_cell_policy(cells.into());
            let request = markdown_to_request(&markdown, after.as_deref(), &options)?;

            let json = if compact {
                serde_json::to_string(&request)?
            } else {
                serde_json::to_string_pretty(&request)?
            };

            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    eprintln!(
                        "{} wrote {} blocks to {}",
                        "ok:".green().bold(),
                        request.children.len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }
        }

        Commands::Read { page_id, token } => {
            let api = Api::new(HttpTransport::new(token));
            let text = api.page_text(&page_id)?;
            println!("{}", text);
        }

        Commands::Append {
            page_id,
            input,
            after,
            token,
        } => {
            let markdown = read_input(input.as_deref())?;
            let api = Api::new(HttpTransport::new(token));
            api.append_markdown(&page_id, &markdown, after.as_deref())?;
            eprintln!("{} appended to {}", "ok:".green().bold(), page_id);
        }

        Commands::Search {
            query,
            page_size,
            token,
        } => {
            let api = Api::new(HttpTransport::new(token));
            let mut search = SearchQuery::new(query);
            if let Some(size) = page_size {
                search = search.with_page_size(size);
            }
            let results = api.search(&search)?;

            if results.is_empty() {
                eprintln!("{} no matches", "ok:".green().bold());
            }
            for result in &results {
                let id = result
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("<no id>");
                let object = result
                    .get("object")
                    .and_then(|v| v.as_str())
                    .unwrap_or("object");
                let title = page_title(result).unwrap_or_else(|| "<untitled>".to_string());
                println!("{}  {}  {}", id.cyan(), object.dimmed(), title);
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> notemark::Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
