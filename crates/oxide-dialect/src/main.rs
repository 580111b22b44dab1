//! oxide-dialect CLI
//!
//! Command-line tool for inspecting a database through its dialect.

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oxide_dialect::prelude::*;

/// Inspect databases through their SQL dialect.
#[derive(Parser)]
#[command(name = "oxide-dialect")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL; its scheme selects the dialect.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the column type for a value kind (no connection needed).
    ColumnType {
        /// Value kind: int64, string, bytes, bytes:16, timestamp, geopoint, ...
        kind: String,

        /// Declared size of the field.
        #[arg(short, long, default_value_t = 0)]
        size: usize,

        /// Print the primary key type instead.
        #[arg(short, long)]
        primary_key: bool,

        /// Dialect to use instead of the one from the database URL.
        #[arg(long)]
        dialect: Option<String>,
    },

    /// Print the schema name from the database URL.
    SchemaName,

    /// Check whether a table exists.
    HasTable {
        /// Table name.
        table: String,
    },

    /// Check whether a column exists.
    HasColumn {
        /// Table name.
        table: String,

        /// Column name.
        column: String,
    },

    /// Drop an index from a table.
    DropIndex {
        /// Table the index belongs to.
        table: String,

        /// Index name.
        index: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::ColumnType {
            kind,
            size,
            primary_key,
            dialect,
        } => {
            let dialect = match dialect {
                Some(name) => name.parse::<DialectKind>()?.dialect(),
                None => AnyDialect::from_url(&cli.database)?,
            };
            let value = ValueDescriptor::from_kind(kind.parse()?);
            let column = if primary_key {
                dialect.primary_key_type(&value, size)?
            } else {
                dialect.column_type(&value, size)?
            };
            println!("{column}");
        }

        Commands::SchemaName => {
            let dialect = AnyDialect::from_url(&cli.database)?;
            println!("{}", dialect.schema_name(&cli.database)?);
        }

        Commands::HasTable { table } => {
            let db = Database::connect(&cli.database).await?;
            println!("{}", db.has_table(&table).await?);
        }

        Commands::HasColumn { table, column } => {
            let db = Database::connect(&cli.database).await?;
            println!("{}", db.has_column(&table, &column).await?);
        }

        Commands::DropIndex { table, index } => {
            let db = Database::connect(&cli.database).await?;
            db.remove_index(&table, &index).await?;
        }
    }

    Ok(())
}
