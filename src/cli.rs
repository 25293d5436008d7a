use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "pom-licenses",
    about = "Resolve dependency licenses from POM descriptors, following parent chains",
    version
)]
pub struct Cli {
    /// Project path to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file [default: ./.pom-licenses/config.toml, fallback ~/.config/pom-licenses/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dependency group to analyze (repeatable); overrides the configured groups
    #[arg(short, long = "group", value_name = "NAME")]
    pub groups: Vec<String>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Write the JSON report to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only use the local Maven repository
    #[arg(long)]
    pub offline: bool,

    /// Exit with status 1 when any dependency ends up without a license
    #[arg(long)]
    pub fail_on_missing: bool,

    /// Show every dependency and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["pom-licenses"]);
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(cli.groups.is_empty());
        assert!(matches!(cli.report, ReportFormat::Terminal));
    }

    #[test]
    fn test_repeated_groups() {
        let cli = Cli::parse_from([
            "pom-licenses",
            "--group",
            "compile",
            "-g",
            "runtime",
            "--report",
            "json",
            "app",
        ]);
        assert_eq!(cli.groups, vec!["compile", "runtime"]);
        assert!(matches!(cli.report, ReportFormat::Json));
        assert_eq!(cli.path, PathBuf::from("app"));
    }
}
