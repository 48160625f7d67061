//! Step output for the CI log.
//!
//! Plain formatting functions; warnings are also echoed as workflow
//! annotations so they show up on the run summary.

use console::style;

use crate::action;
use crate::boundary::BoundaryWarning;
use crate::domain::{ChangeSet, Increment, Version};

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

/// Display a boundary warning and raise it as a workflow warning.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    println!("{} {}", style("⚠").yellow(), warning);
    action::warning(&warning.to_string());
}

/// Display the classified changes, one line per entry.
pub fn display_change_set(changes: &ChangeSet) {
    println!(
        "\n{}",
        style(format!("Classified {} change(s):", changes.len())).bold()
    );
    for entry in &changes.breaking {
        println!("  {} {}", style("major").red(), entry);
    }
    for entry in &changes.features {
        println!("  {} {}", style("minor").cyan(), entry);
    }
    for entry in &changes.fixes {
        println!("  {} {}", style("patch").green(), entry);
    }
}

/// Display the version change a release makes.
///
/// # Arguments
/// * `previous` - Current tag, `None` when starting from the default version
/// * `next` - The version being released
/// * `increment` - The bump that produced `next`
pub fn display_version_change(previous: Option<&str>, next: &Version, increment: Increment) {
    match previous {
        Some(old) => {
            println!("\n{}", style(format!("Release ({})", increment)).bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(next).green());
        }
        None => {
            println!("\n{}", style("Initial Release").bold());
            println!("  New tag: {}", style(next).green());
        }
    }
}
