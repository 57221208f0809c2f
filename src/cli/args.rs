//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Convert SMART Configurable Model packages into Mapeo presets, fields and icons
#[derive(Parser, Debug)]
#[command(name = "smart2mapeo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "SMART2MAPEO_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a SMART package into mapeo-settings-builder input
    Convert {
        /// SMART package (.zip), extracted package directory, or model file
        #[arg(value_hint = ValueHint::AnyPath)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".", value_hint = ValueHint::DirPath)]
        output: PathBuf,

        /// Also write the parsed model as cm_model.json
        #[arg(long)]
        dump_model: bool,

        /// Keep the extraction directory after conversion
        #[arg(long)]
        keep_work_dir: bool,
    },

    /// Show the category tree and derived presets without writing anything
    Inspect {
        /// SMART package (.zip), extracted package directory, or model file
        #[arg(value_hint = ValueHint::AnyPath)]
        source: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
