//! CLI probe for `lazyprovider_core`.
//!
//! # Responsibility
//! - Load a provider config and run one dispatcher call against it.
//! - Print results and every change notification that fired.

use clap::{Parser, Subcommand};
use lazyprovider_core::{
    init_logging, ChangeNotifier, ContentDispatcher, ContentValues, ProviderConfig, ResourceUri,
    SqliteStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lazyprovider", version = lazyprovider_core::core_version())]
#[command(about = "Route content:// identifiers to a SQLite-backed provider", long_about = None)]
struct Cli {
    /// Provider config (JSON).
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the content type of an identifier
    Type { uri: String },
    /// Query rows addressed by an identifier
    Query {
        uri: String,
        #[arg(short, long, value_delimiter = ',')]
        projection: Option<Vec<String>>,
        #[arg(short, long)]
        selection: Option<String>,
        #[arg(short = 'a', long = "arg")]
        args: Vec<String>,
        #[arg(long)]
        sort: Option<String>,
    },
    /// Insert one row from a JSON object
    Insert { uri: String, values: String },
    /// Update rows from a JSON object
    Update {
        uri: String,
        values: String,
        #[arg(short, long)]
        selection: Option<String>,
        #[arg(short = 'a', long = "arg")]
        args: Vec<String>,
    },
    /// Delete rows addressed by an identifier
    Delete {
        uri: String,
        #[arg(short, long)]
        selection: Option<String>,
        #[arg(short = 'a', long = "arg")]
        args: Vec<String>,
    },
}

struct PrintNotifier;

impl ChangeNotifier for PrintNotifier {
    fn notify_change(&self, uri: &ResourceUri) {
        println!("notify {uri}");
    }
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = ProviderConfig::load(&cli.config)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.effective_log_level(), log_dir)?;
    }

    let router = Arc::new(config.build_router()?);
    let conn = config.open_connection()?;
    let dispatcher = ContentDispatcher::new(router, SqliteStore::new(&conn), PrintNotifier);

    match cli.command {
        Commands::Type { uri } => {
            println!("{}", dispatcher.get_type(&ResourceUri::parse(&uri)?)?);
        }
        Commands::Query {
            uri,
            projection,
            selection,
            args,
            sort,
        } => {
            let projection: Option<Vec<&str>> = projection
                .as_ref()
                .map(|columns| columns.iter().map(String::as_str).collect());
            let rows = dispatcher.query(
                &ResourceUri::parse(&uri)?,
                projection.as_deref(),
                selection.as_deref(),
                &as_strs(&args),
                sort.as_deref(),
            )?;
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Insert { uri, values } => {
            let values: ContentValues = serde_json::from_str(&values)?;
            match dispatcher.insert(&ResourceUri::parse(&uri)?, &values)? {
                Some(created) => println!("inserted {created}"),
                None => println!("insert rejected"),
            }
        }
        Commands::Update {
            uri,
            values,
            selection,
            args,
        } => {
            let values: ContentValues = serde_json::from_str(&values)?;
            let count = dispatcher.update(
                &ResourceUri::parse(&uri)?,
                &values,
                selection.as_deref(),
                &as_strs(&args),
            )?;
            println!("updated {count}");
        }
        Commands::Delete {
            uri,
            selection,
            args,
        } => {
            let count = dispatcher.delete(
                &ResourceUri::parse(&uri)?,
                selection.as_deref(),
                &as_strs(&args),
            )?;
            println!("deleted {count}");
        }
    }

    Ok(())
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}
