//! Output formatting utilities

use console::{style, Style};

use modship_core::ArtifactIndex;
use modship_stores::PublishReport;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for version numbers
pub fn version_style() -> Style {
    Style::new().green().bold()
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Print staged artifacts with size and digest
pub fn artifacts(index: &ArtifactIndex) {
    println!("{}", header("Artifacts"));
    for (key, artifact) in index.iter() {
        println!(
            "  {} {} ({} bytes, sha256 {})",
            version_style().apply_to(key),
            path_style().apply_to(&artifact.file_name),
            artifact.size,
            short_digest(&artifact.sha256)
        );
    }
}

/// Print one line per upload
pub fn uploads(report: &PublishReport) {
    println!("{}", header(&report.platform.to_string()));
    for upload in &report.uploads {
        let status = if upload.dry_run {
            style("skipped (dry run)").yellow().to_string()
        } else {
            match &upload.remote_id {
                Some(id) => style(format!("uploaded as {}", id)).green().to_string(),
                None => style("uploaded").green().to_string(),
            }
        };
        println!("  {} {} {}", upload.key, path_style().apply_to(&upload.file_name), status);
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
