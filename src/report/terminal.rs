use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Dependency, LicenseSource};

/// Per-source tallies shown in the summary box.
#[derive(Debug, Default, PartialEq)]
struct Summary {
    declared: usize,
    inherited: usize,
    overridden: usize,
    missing: usize,
    unresolved: usize,
}

impl Summary {
    fn of(deps: &[Dependency]) -> Self {
        let mut summary = Summary::default();
        for dep in deps {
            match dep.source {
                LicenseSource::Descriptor => summary.declared += 1,
                LicenseSource::Parent(_) => summary.inherited += 1,
                LicenseSource::Override => summary.overridden += 1,
                LicenseSource::Missing => summary.missing += 1,
                LicenseSource::Unresolved(_) => summary.unresolved += 1,
            }
        }
        summary
    }

    fn without_license(&self) -> usize {
        self.missing + self.unresolved
    }
}

/// Render a colored terminal report.
pub fn render(deps: &[Dependency], path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = deps.len();
    let summary = Summary::of(deps);
    let licensed = total - summary.without_license();

    if quiet {
        println!(
            "Total: {}  Licensed: {}  Missing: {}  Unresolved: {}",
            total,
            licensed.to_string().green(),
            summary.missing.to_string().yellow(),
            summary.unresolved.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "pom-licenses".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Project: {}\n", path.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total dependencies : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Declared        : {:>4}", "✓".green(), summary.declared)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Inherited       : {:>4}", "✓".green(), summary.inherited)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Override        : {:>4}", "✓".green(), summary.overridden)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Missing         : {:>4}", "⚠".yellow(), summary.missing)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unresolved      : {:>4}", "✗".red(), summary.unresolved)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if summary.without_license() > 0 {
        println!(
            " {} Dependencies without a license:\n",
            "[MISSING]".yellow().bold()
        );
        render_table(deps.iter().filter(|d| d.licenses.is_empty()));
        println!();
    }

    if verbose && licensed > 0 {
        println!(" {} Licensed dependencies:\n", "[OK]".green().bold());
        render_table(deps.iter().filter(|d| !d.licenses.is_empty()));
        println!();
    }

    Ok(())
}

fn render_table<'a>(deps: impl Iterator<Item = &'a Dependency>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Dependency").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("URL").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
        ]);

    for dep in deps {
        let source_color = match dep.source {
            LicenseSource::Descriptor | LicenseSource::Parent(_) => Color::Green,
            LicenseSource::Override => Color::Cyan,
            LicenseSource::Missing => Color::Yellow,
            LicenseSource::Unresolved(_) => Color::Red,
        };

        table.add_row(vec![
            Cell::new(&dep.id),
            Cell::new(license_names(dep)),
            Cell::new(license_urls(dep)),
            Cell::new(dep.source.to_string()).fg(source_color),
        ]);
    }

    println!("{}", table);
}

fn license_names(dep: &Dependency) -> String {
    if dep.licenses.is_empty() {
        return "unknown".to_string();
    }
    dep.licenses
        .iter()
        .map(|l| l.name.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn license_urls(dep: &Dependency) -> String {
    dep.licenses
        .iter()
        .map(|l| l.url.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
