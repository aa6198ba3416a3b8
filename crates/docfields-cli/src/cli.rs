//! Command-line argument parsing.

use clap::Parser;
use docfields_llm::gemini::API_KEY_ENV;
use std::path::PathBuf;

/// docfields - extract structured fields from OCR'd documents with an LLM.
///
/// Running without arguments performs one full batch pass.
#[derive(Debug, Default, Parser)]
#[command(name = "docfields")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory with one subdirectory of records per doctype
    #[arg(long)]
    pub input_root: Option<PathBuf>,

    /// Directory receiving the output tree
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// API key for the hosted model
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_parse() {
        let cli = Cli::try_parse_from([
            "docfields",
            "--config",
            "docfields.toml",
            "--input-root",
            "scans",
            "--output-root",
            "out",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("docfields.toml")));
        assert_eq!(cli.input_root, Some(PathBuf::from("scans")));
        assert_eq!(cli.output_root, Some(PathBuf::from("out")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_api_key_reads_gemini_env() {
        let command = Cli::command();
        let api_key = command
            .get_arguments()
            .find(|arg| arg.get_id() == "api_key")
            .unwrap();
        assert_eq!(api_key.get_env(), Some(std::ffi::OsStr::new(API_KEY_ENV)));
        assert_eq!(API_KEY_ENV, "GEMINI_API_KEY");
    }
}
