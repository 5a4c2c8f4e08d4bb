use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "complexgen developers",
    version,
    about = "complexgen CLI - Generate molecular complex species and their elementary reactions from binding rules.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to process reactors in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate every reachable complex species and the reactions between them.
    Generate(GenerateArgs),
    /// Validate a rule file and summarize its entities, sites and reaction chains.
    Check(CheckArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the rule file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override `generation.max-iterations` from the rule file.
    #[arg(long, value_name = "INT", conflicts_with = "unbounded")]
    pub max_iterations: Option<usize>,

    /// Run every phase until it converges, without an iteration budget.
    #[arg(long)]
    pub unbounded: bool,

    /// Skip the pre-reaction phase even if the rule file defines one.
    #[arg(long)]
    pub no_pre_reactions: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the rule file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_accepts_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "complexgen",
            "generate",
            "-i",
            "rules.toml",
            "-vv",
            "-j",
            "4",
            "--max-iterations",
            "20",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Generate(args) = cli.command else {
            panic!("Expected 'generate' subcommand");
        };
        assert_eq!(args.input, PathBuf::from("rules.toml"));
        assert_eq!(args.max_iterations, Some(20));
        assert!(!args.unbounded);
    }

    #[test]
    fn budget_and_unbounded_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "complexgen",
            "generate",
            "-i",
            "rules.toml",
            "--max-iterations",
            "5",
            "--unbounded",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn check_requires_an_input() {
        assert!(Cli::try_parse_from(["complexgen", "check"]).is_err());
    }
}
