use std::path::PathBuf;

use clap::{Parser, Subcommand};
use discourse_core::ResultSort;

#[derive(Parser)]
#[command(name = "discourse")]
#[command(about = "Query a discourse graph through typed relation templates", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./discourse.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Schema file, overriding `schema.path`
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default discourse.toml and schema.toml
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
    /// List declared node types
    Types,
    /// List every relation label a condition may use
    Labels,
    /// Show which node types a page title belongs to
    Match {
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Compile queries to Datalog (the scratch query when no file is given)
    Compile {
        /// Query files in line form
        files: Vec<PathBuf>,
    },
    /// Compile and run a query against the configured graph
    Run {
        /// Query file in line form (the scratch query when omitted)
        file: Option<PathBuf>,

        /// Run a saved query by label
        #[arg(long, conflicts_with = "file")]
        saved: Option<String>,

        /// Result ordering
        #[arg(long, default_value_t = ResultSort::TitleAsc)]
        sort: ResultSort,

        /// Print raw rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit the scratch query and manage saved queries
    Query {
        #[command(subcommand)]
        command: QueryCommands,
    },
}

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Show the scratch query
    Show,
    /// Set the return variable
    Return { variable: String },
    /// Append a condition
    Add {
        source: String,
        /// Relation label, e.g. "Supported By"
        relation: String,
        #[arg(required = true)]
        target: Vec<String>,
    },
    /// Replace the statement of a condition, keeping its id
    Update {
        uid: String,
        source: String,
        relation: String,
        #[arg(required = true)]
        target: Vec<String>,
    },
    /// Remove a condition by id
    Remove { uid: String },
    /// Suggest sources for the next condition
    Sources,
    /// Discard the scratch query
    Clear,
    /// Save the scratch query and start a new one
    Save {
        /// Label (defaults to the next "Query N")
        label: Option<String>,
    },
    /// List saved queries
    List,
    /// Move a saved query back into the scratch
    Edit { label: String },
    /// Delete a saved query
    Delete { label: String },
}
