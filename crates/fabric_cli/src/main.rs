//! Fabric CLI — maps a netlist onto a pool of interconnected devices.
//!
//! Provides `fabric map` to run the full oracle-plus-refinement flow over a
//! design directory, and `fabric check` to validate an existing assignment
//! file against the design's resource and hop constraints.

#![warn(missing_docs)]

mod check;
mod external;
mod map;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Fabric — multi-device netlist partition mapper.
#[derive(Parser, Debug)]
#[command(name = "fabric", version, about = "Fabric partition mapper")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a `fabric.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Partition a design and write the assignment.
    Map(MapArgs),
    /// Check an existing assignment against the design constraints.
    Check(CheckArgs),
}

/// Arguments for the `fabric map` subcommand.
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Design directory holding design.info/.are/.net/.topo.
    #[arg(short, long)]
    pub input_dir: String,

    /// Output assignment file.
    #[arg(short, long)]
    pub output_file: String,

    /// Report output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `fabric check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Design directory holding design.info/.are/.net/.topo.
    #[arg(short, long)]
    pub input_dir: String,

    /// Assignment file to validate.
    pub assignment: String,

    /// Report output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Map(ref args) => map::run(args, cli.quiet, cli.config.as_deref()),
        Command::Check(ref args) => check::run(args, cli.quiet),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_map_basic() {
        let cli = Cli::parse_from(["fabric", "map", "-i", "designs/d1", "-o", "out.txt"]);
        match cli.command {
            Command::Map(ref args) => {
                assert_eq!(args.input_dir, "designs/d1");
                assert_eq!(args.output_file, "out.txt");
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_map_json_format() {
        let cli = Cli::parse_from([
            "fabric",
            "map",
            "--input-dir",
            "d",
            "--output-file",
            "o",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Map(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["fabric", "check", "-i", "designs/d1", "out.txt"]);
        match cli.command {
            Command::Check(ref args) => {
                assert_eq!(args.input_dir, "designs/d1");
                assert_eq!(args.assignment, "out.txt");
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "fabric",
            "--quiet",
            "--config",
            "fabric.toml",
            "check",
            "-i",
            "d",
            "a.txt",
        ]);
        assert!(cli.quiet);
        assert_eq!(cli.config.as_deref(), Some("fabric.toml"));
    }

    #[test]
    fn map_requires_input_and_output() {
        assert!(Cli::try_parse_from(["fabric", "map", "-i", "d"]).is_err());
        assert!(Cli::try_parse_from(["fabric", "map", "-o", "o"]).is_err());
    }
}
