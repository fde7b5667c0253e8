use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::catalog::RelationSource;
use crate::setup::Eol;

#[derive(Parser, Debug)]
#[command(
    name = "schema-draw",
    version,
    about = "Draw relation schemas, run external transformations and generate config files"
)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the relation schema of a DBML file as SVG
    Schema {
        /// Input DBML file path
        input: PathBuf,

        /// Database (DBML schema) to draw
        #[arg(long, default_value = "public")]
        db: String,

        /// Table to include; repeat for several, default is every table
        #[arg(short, long = "table")]
        tables: Vec<String>,

        /// Layout file with stored table coordinates and internal relations
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Write the final table coordinates back to the layout file
        #[arg(long, requires = "layout")]
        save_layout: bool,

        /// Output SVG path; defaults to the suggested file name
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page number shown in the document title
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Page name, used as the output file name
        #[arg(long)]
        page_name: Option<String>,

        /// Color relation lines
        #[arg(long)]
        show_color: bool,

        /// Only show key columns
        #[arg(long)]
        show_keys: bool,

        /// Prefix table titles with their dimensions
        #[arg(long)]
        show_dimension: bool,

        /// Give every table the width of the widest one
        #[arg(long)]
        same_width: bool,

        /// Relations to draw: declared foreign keys, layout-file relations, or both
        #[arg(long, value_enum, default_value_t = Relations::Both)]
        relations: Relations,
    },

    /// Pipe stdin through an external program and print the result
    Transform {
        /// TOML file listing the allowed programs
        #[arg(short, long)]
        programs: Option<PathBuf>,

        /// Transformation option, in order: program index, extra arguments
        /// (ignored), escape output, no-wrap
        #[arg(short = 'O', long = "option")]
        options: Vec<String>,
    },

    /// Generate a PHP config file from a JSON or TOML configuration
    Config {
        /// Input configuration (.json or .toml)
        input: PathBuf,

        /// TOML file with persisted keys and their defaults
        #[arg(long)]
        defaults: Option<PathBuf>,

        /// Output path; defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Line ending of the generated file
        #[arg(long, value_enum, default_value_t = LineEnding::Unix)]
        eol: LineEnding,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relations {
    Internal,
    Foreign,
    Both,
}

impl From<Relations> for RelationSource {
    fn from(relations: Relations) -> Self {
        match relations {
            Relations::Internal => RelationSource::Internal,
            Relations::Foreign => RelationSource::ForeignKeys,
            Relations::Both => RelationSource::Both,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Unix,
    Win,
}

impl From<LineEnding> for Eol {
    fn from(eol: LineEnding) -> Self {
        match eol {
            LineEnding::Unix => Eol::Unix,
            LineEnding::Win => Eol::Windows,
        }
    }
}
