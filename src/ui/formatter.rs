//! Pure formatting functions for terminal output.
//!
//! Errors and warnings go to stderr; everything else goes to stdout.

use console::style;

use crate::domain::VersionDecision;
use crate::notes::ReleaseNotes;
use crate::publish::PublishedVersion;
use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change (or initial version).
pub fn display_decision(decision: &VersionDecision, context: &str) {
    println!("\n{}", style(format!("{} release", context)).bold());
    match decision.previous {
        Some(previous) => {
            println!("  From: {}", style(previous).red());
            println!("  To:   {}", style(decision.next).green());
        }
        None => println!("  Initial version: {}", style(decision.next).green()),
    }
    println!("  Increment: {}", decision.increment);
}

/// Display at most `max_lines` lines of the rendered notes.
pub fn display_notes_preview(notes: &ReleaseNotes, max_lines: usize) {
    let (preview, hidden) = notes.preview(max_lines);
    println!("\n{}", style("Release notes preview:").underlined());
    for line in preview.lines() {
        println!("  {}", line);
    }
    if hidden > 0 {
        println!("  {}", style(format!("... and {} more lines", hidden)).dim());
    }
}

/// Display the outcome of a publish call.
pub fn display_published(published: &PublishedVersion) {
    if published.dry_run {
        display_status(&format!(
            "Dry run: {} was not tagged or published",
            published.version
        ));
    } else {
        display_success(&format!(
            "Published {} at {}",
            published.version,
            &published.commit[..published.commit.len().min(7)]
        ));
    }
}
