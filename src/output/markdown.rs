//! Markdown run report generation
//!
//! This module renders a finished run as a human-readable markdown file,
//! including the run counters and the links discovered during the run.

use crate::invite::InviteLink;
use crate::output::summary::RunSummary;
use crate::output::{OutputError, OutputResult};
use std::path::Path;

/// Writes a markdown report of a run
///
/// # Arguments
///
/// * `summary` - The run summary
/// * `new_links` - Links first discovered by this run
/// * `config_hash` - Hash of the configuration file, if one was used
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    summary: &RunSummary,
    new_links: &[InviteLink],
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary, new_links, config_hash);

    std::fs::write(output_path, markdown).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(
    summary: &RunSummary,
    new_links: &[InviteLink],
    config_hash: Option<&str>,
) -> String {
    let mut md = String::new();

    md.push_str("# Invite-Scout Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Status**: {}\n", summary.state));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Queries\n\n");
    md.push_str("| Generated | Scheduled | Attempted | Next Index |\n");
    md.push_str("|-----------|-----------|-----------|------------|\n");
    md.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        summary.queries_generated,
        summary.queries_scheduled,
        summary.queries_attempted,
        summary.next_index
    ));

    md.push_str("## Links\n\n");
    md.push_str(&format!("- **New This Run**: {}\n", summary.new_links));
    md.push_str(&format!("- **Total Stored**: {}\n\n", summary.total_links));

    if !new_links.is_empty() {
        md.push_str("## Discovered Links\n\n");
        for link in new_links {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');
    }

    md
}
