//! tocdex: builds a Dash docset from a documentation page's table of contents.
//!
//! Usage:
//!   tocdex                          Build kafka.docset for Kafka 0.8.2
//!   tocdex --doc-version 0.8.1      Build another version
//!   tocdex --config zookeeper.toml  Build the docset a config file describes
//!   tocdex --rescan                 Re-index the pages already downloaded
//!   tocdex --dry-run                Print the records as JSON lines
//!
//! Logging goes to stderr. Set `RUST_LOG` to change the filter.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use owo_colors::OwoColorize;
use tocdex_docset::{DocsetBuilder, DocsetConfig, PageSource, RunReport};

/// Build an offline docset by indexing a documentation page's table of contents
#[derive(Parser, Debug)]
#[command(name = "tocdex")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Build kafka.docset from the Kafka 0.8.2 documentation
    tocdex

    # Another version, into another directory
    tocdex --doc-version 0.8.1 --output kafka-081.docset

    # Keep the page as served instead of normalizing it
    tocdex --no-normalize

    # Re-index the local copies without touching the network
    tocdex --rescan

    # Show what would be indexed
    tocdex --dry-run
"#)]
struct Cli {
    /// TOML file describing the docset (defaults to the Kafka documentation)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Documentation version, e.g. 0.8.2
    #[arg(long, value_name = "VERSION")]
    doc_version: Option<String>,

    /// The .docset directory to write
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Store and scan pages as served, skipping the normalization service
    #[arg(long)]
    no_normalize: bool,

    /// Scan the pages already in the docset instead of downloading them
    #[arg(long)]
    rescan: bool,

    /// Print records as JSON lines instead of writing the docset
    #[arg(long)]
    dry_run: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// The configuration file (or the defaults) with flags applied on top.
    fn docset_config(&self) -> Result<DocsetConfig> {
        let mut config = match &self.config {
            Some(path) => DocsetConfig::load(path)?,
            None => DocsetConfig::default(),
        };
        if let Some(version) = &self.doc_version {
            config.version.clone_from(version);
        }
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if self.no_normalize {
            config.normalizer_url = None;
        }
        Ok(config)
    }

    const fn source(&self) -> PageSource {
        if self.rescan {
            PageSource::LocalCopy
        } else {
            PageSource::Remote
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.docset_config()?;
    log::info!(
        "{} {} ({} page(s)) into {}",
        config.name,
        config.version,
        config.pages.len(),
        config.output.display()
    );
    let builder = DocsetBuilder::new(config).context("invalid docset configuration")?;

    if cli.dry_run {
        let (report, index) = builder.dry_run(cli.source())?;
        let mut out = io::stdout().lock();
        for record in index.records() {
            serde_json::to_writer(&mut out, record)?;
            writeln!(out)?;
        }
        print_summary(&report);
    } else {
        let report = builder.build(cli.source()).with_context(|| {
            format!(
                "failed to build docset at {}",
                builder.layout().root().display()
            )
        })?;
        print_summary(&report);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_filter)).init();
}

/// Per-page results and totals, on stderr so stdout stays machine-readable.
fn print_summary(report: &RunReport) {
    eprintln!();
    for outcome in &report.pages {
        let page = &outcome.page.path;
        match &outcome.result {
            Ok(scan) if scan.is_malformed() => eprintln!(
                "  {} {page}: {} record(s), {}",
                "!".yellow(),
                scan.records_emitted,
                scan.termination
            ),
            Ok(scan) if !scan.toc_found => {
                eprintln!("  {} {page}: no table of contents found", "!".yellow());
            }
            Ok(scan) => eprintln!(
                "  {} {page}: {} record(s)",
                "✓".green(),
                scan.records_emitted
            ),
            Err(err) => eprintln!("  {} {page}: {err}", "✗".red()),
        }
    }

    let failed = report.failures().count();
    let totals = format!(
        "{} record(s), {} dropped, {} of {} page(s) failed",
        report.records_emitted(),
        report.records_dropped(),
        failed,
        report.pages.len()
    );
    if report.is_clean() {
        eprintln!("{} {totals}", "Done:".green().bold());
    } else {
        eprintln!("{} {totals}", "Done with problems:".yellow().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_kafka_from_the_network() {
        let cli = Cli::try_parse_from(["tocdex"]).unwrap();
        let config = cli.docset_config().unwrap();
        assert_eq!(config, DocsetConfig::default());
        assert_eq!(cli.source(), PageSource::Remote);
    }

    #[test]
    fn flags_override_the_config() {
        let cli = Cli::try_parse_from([
            "tocdex",
            "--doc-version",
            "0.8.1",
            "--output",
            "out.docset",
            "--no-normalize",
            "--rescan",
        ])
        .unwrap();
        let config = cli.docset_config().unwrap();
        assert_eq!(config.url_version(), "081");
        assert_eq!(config.output, PathBuf::from("out.docset"));
        assert_eq!(config.normalizer(), None);
        assert_eq!(cli.source(), PageSource::LocalCopy);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["tocdex", "--config", "/nonexistent/tocdex.toml"]).unwrap();
        assert!(cli.docset_config().is_err());
    }
}
