use anyhow::{Context, Result};
use log::debug;

use crate::{domain::service::PackageSummary, runtime::Runtime};

use super::config::IndexConfig;
use super::open_index;

/// Show detailed information about a package
#[tracing::instrument(skip(runtime, config))]
pub fn show<R: Runtime>(runtime: R, config: &IndexConfig, name: &str) -> Result<()> {
    debug!("Showing info for {}", name);
    let index = open_index(&runtime, config);
    let summary = index
        .package_summary(name)
        .with_context(|| format!("Failed to load package {}", name))?;

    print!("{}", render(&summary));
    Ok(())
}

pub(crate) fn render(summary: &PackageSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Package: {}\n", summary.package));
    out.push_str(&format!("URL: {}\n", summary.url));
    out.push_str(&format!("Install: {}\n", summary.install_command));
    if let Some(line) = &summary.requirement_line {
        out.push_str(&format!("Requirement: {}\n", line));
    }
    match &summary.latest {
        Some(latest) => out.push_str(&format!("Latest: {}\n", latest.version)),
        None => out.push_str("Latest: (none)\n"),
    }
    out.push_str(&format!("Downloads: {}\n", summary.downloads));

    if summary.releases.is_empty() {
        out.push_str("\nNo releases.\n");
        return out;
    }

    out.push_str("\nReleases:\n");
    for entry in &summary.releases {
        let release = &entry.release;
        let hidden = if release.hidden { " (hidden)" } else { "" };
        out.push_str(&format!(
            "  [{}] {}{}  downloads: {}\n",
            release.order, release.version, hidden, entry.downloads
        ));
        if !release.summary.is_empty() {
            out.push_str(&format!("      {}\n", release.summary));
        }
        out.push_str(&format!("      {}\n", entry.requirement_line));
        for file in &entry.files {
            let python = file.python_version_display();
            out.push_str(&format!(
                "      - {} [{}{}] {} download(s)\n",
                file.display_name(),
                file.file_type.label(),
                if python.is_empty() {
                    String::new()
                } else {
                    format!(", py{}", python)
                },
                file.downloads
            ));
        }
        for dependency in &entry.dependencies {
            out.push_str(&format!(
                "      {}: {} {}\n",
                dependency.kind.label(),
                dependency,
                dependency.version
            ));
        }
    }
    out
}
