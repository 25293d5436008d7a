//! `pom-licenses` — resolve the license of every dependency from its POM, walking parents.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]).
//! 3. Read the project's build files and collect coordinates ([`collector`]).
//! 4. Build the repository chain and retriever ([`registry`]).
//! 5. Resolve licenses per coordinate ([`license::resolver`]) and sort the rows ([`aggregate`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` with `--fail-on-missing` when a row has no license.

mod aggregate;
mod cli;
mod collector;
mod config;
mod descriptor;
mod detector;
mod license;
mod models;
mod registry;
mod report;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use collector::{collect, ProjectModel};
use config::{load_config, Config};
use license::overrides::LicenseOverrides;
use license::resolver::LicenseResolver;
use models::Coordinate;
use registry::local::LocalRepository;
use registry::remote::MavenRepository;
use registry::{RepositoryChain, Retriever};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;

    let model = ProjectModel::load(&path)?;
    debug!(groups = ?model.group_names().collect::<Vec<_>>(), "dependency groups found");

    let groups = if cli.groups.is_empty() {
        config.groups.clone()
    } else {
        cli.groups.clone()
    };
    let coordinates: Vec<Coordinate> = collect(&model, &groups).into_iter().collect();

    if !cli.quiet {
        eprintln!(
            "  {} {} dependencies in {}",
            "→".cyan(),
            coordinates.len(),
            groups.join(", ")
        );
    }

    let retriever = build_retriever(&config, cli.offline)?;
    let overrides = LicenseOverrides::from_rules(&config.overrides);
    let resolver = LicenseResolver::new(&retriever, &overrides, config.resolver.max_depth);

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(coordinates.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let resolver = &resolver;
    let deps = aggregate::aggregate(
        &coordinates,
        config.resolver.concurrency,
        pb.as_ref(),
        |coordinate| async move { resolver.resolve(&coordinate).await },
    )
    .await;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&deps, &path, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            report::json::render(&deps, cli.output.as_deref())?;
        }
    }

    let missing = deps.iter().any(|d| d.licenses.is_empty());
    if cli.fail_on_missing && missing {
        std::process::exit(1);
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings by default, debug with `-v`, errors only with `-q`.
fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Local repository first, then the configured remotes unless offline.
fn build_retriever(config: &Config, offline: bool) -> Result<Retriever> {
    let mut chain = RepositoryChain::new();

    let local = config
        .local_repository
        .clone()
        .or_else(LocalRepository::default_location);
    if let Some(root) = local {
        let repo = LocalRepository::new(root);
        debug!(root = %repo.root().display(), "using local repository");
        chain.push(repo);
    }

    if !(offline || config.offline) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.resolver.timeout_secs))
            .build()?;
        for url in &config.repositories {
            chain.push(MavenRepository::new(client.clone(), url));
        }
    }

    if chain.is_empty() {
        warn!("no repositories configured; every dependency will be unresolved");
    }

    let retriever = Retriever::new(chain);
    Ok(if config.resolver.cache {
        retriever.with_cache()
    } else {
        retriever
    })
}
