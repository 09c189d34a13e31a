use crate::analysis::ValueGroup;
use crate::apply::{BatchReport, FileStatus};
use crate::constants::{COVER_CHOICE, NOT_SET};
use crate::cover::CoverImage;
use crate::plan::{PerFileOutcome, display_value};
use crate::tags::TagField;
use owo_colors::OwoColorize;
use std::fmt::Display;
use std::path::Path;

const RULE_WIDTH: usize = 60;

pub fn print_banner() {
    println!("{}", "=".repeat(RULE_WIDTH).bright_black());
    println!("{}", "tagfix - batch audio tag editor".cyan().bold());
    println!("{}", "=".repeat(RULE_WIDTH).bright_black());
}

pub fn print_found(count: usize, dir: &Path) {
    println!(
        "{} {} audio file(s) in {}",
        "Found".bright_black(),
        count.to_string().green().bold(),
        dir.display().to_string().cyan()
    );
}

pub fn print_no_files(dir: &Path) {
    println!(
        "{} No audio files found in {}",
        "!".yellow(),
        dir.display().to_string().cyan()
    );
}

pub fn print_skip_warning(path: &Path, reason: &str) {
    eprintln!(
        "  {} Skipping {}: {}",
        "⚠".yellow(),
        path.display().to_string().yellow(),
        reason.bright_black()
    );
}

pub fn print_error(err: &dyn Display) {
    eprintln!("{} {err}", "Error:".red().bold());
}

pub fn print_field_menu() {
    println!("\n{}", "Select fields to edit".yellow().bold());
    for field in TagField::ALL {
        println!(
            "  {} {}",
            format!("[{}]", field.menu_number()).cyan(),
            field.label()
        );
    }
    println!(
        "  {} Cover image (local jpg/png/bmp/gif)",
        format!("[{COVER_CHOICE}]").cyan()
    );
    println!(
        "{}",
        "Enter numbers separated by commas or spaces, 'all', or nothing to go back".bright_black()
    );
}

pub fn print_cover_status(with_cover: usize, total: usize) {
    println!(
        "\n{} {}",
        "Cover image".yellow().bold(),
        format!("({with_cover} of {total} file(s) already have a front cover)").bright_black()
    );
}

pub fn print_cover_details(cover: &CoverImage) {
    println!(
        "  {} {} {}",
        "→".bright_black(),
        cover.path.display().to_string().cyan(),
        format!("{}, {} KB", cover.format, cover.size_kb()).bright_black()
    );
}

pub fn print_value_distribution(field: TagField, groups: &[ValueGroup], total: usize) {
    println!("\n{} {}", "Current values of".bright_black(), field.label().yellow().bold());
    println!("{}", "-".repeat(RULE_WIDTH).bright_black());

    if groups.is_empty() {
        println!("  No metadata found");
        return;
    }

    for group in groups {
        let value = group.value.as_deref().unwrap_or(NOT_SET);
        println!(
            "  '{}' - {} file(s) ({:.1}%)",
            value.green(),
            group.count(),
            group.percentage(total)
        );
        if group.count() <= 3 {
            for name in &group.files {
                println!("    {} {}", "-".bright_black(), name);
            }
        } else {
            for name in group.files.iter().take(2) {
                println!("    {} {}", "-".bright_black(), name);
            }
            println!(
                "    {}",
                format!("... and {} more", group.count() - 2).bright_black()
            );
        }
    }
}

pub fn print_per_file_help(field: TagField) {
    println!(
        "\n{} {}  {}",
        "Per-file".bright_black(),
        field.label().yellow().bold(),
        "[Enter]/:s skip file, :q stop asking, :clear empty value".bright_black()
    );
}

pub fn print_per_file_header(
    index: usize,
    total: usize,
    file_name: &str,
    field: TagField,
    current: Option<&str>,
) {
    println!(
        "{} {}  {} {}",
        format!("[{index}/{total}]").bright_black(),
        file_name.cyan(),
        format!("{}:", field.label()).bright_black(),
        display_value(current)
    );
}

pub fn print_per_file_outcome(field: TagField, outcome: &PerFileOutcome) {
    let note = if outcome.cancelled {
        " (stopped early)"
    } else {
        ""
    };
    println!(
        "  {} {}: {} entered, {} skipped{}",
        "→".bright_black(),
        field.label(),
        outcome.entered,
        outcome.skipped,
        note.yellow()
    );
}

pub fn format_file_result(path: &Path, status: &FileStatus) -> String {
    let name = path.display().to_string();
    match status {
        FileStatus::Applied => format!("  {} {}", "✓".green().bold(), name),
        FileStatus::SkippedByUser => format!("  {} {}", "-".bright_black(), name.bright_black()),
        FileStatus::NotReached => format!(
            "  {} {} {}",
            "-".yellow(),
            name.bright_black(),
            "(interrupted)".bright_black()
        ),
        FileStatus::SkippedUnreadable(reason) => {
            format!("  {} {} {}", "⚠".yellow(), name.yellow(), reason.bright_black())
        }
        FileStatus::SaveFailed(reason) => {
            format!("  {} {} {}", "✗".red().bold(), name.red(), reason.bright_black())
        }
    }
}

pub fn print_summary(report: &BatchReport) {
    println!("\n{}", "Batch Operation Summary".yellow().bold());
    println!(
        "  {} Applied:            {}",
        "→".bright_black(),
        report.applied().to_string().green()
    );
    println!(
        "  {} Unchanged:          {}",
        "→".bright_black(),
        report.skipped_by_user()
    );
    println!(
        "  {} Skipped unreadable: {}",
        "→".bright_black(),
        report.skipped_unreadable().to_string().yellow()
    );
    println!(
        "  {} Save failed:        {}",
        "→".bright_black(),
        report.save_failed().to_string().red()
    );
    if report.interrupted {
        println!(
            "  {} Not reached:        {}",
            "→".bright_black(),
            report.not_reached().to_string().yellow()
        );
    }

    let problems: Vec<_> = report
        .results
        .iter()
        .filter(|r| {
            matches!(
                r.status,
                FileStatus::SkippedUnreadable(_) | FileStatus::SaveFailed(_)
            )
        })
        .collect();
    if !problems.is_empty() {
        println!("\n{}", "Problems:".yellow());
        for result in problems {
            println!("{}", format_file_result(&result.path, &result.status));
        }
    }

    if report.interrupted {
        println!(
            "\n{} Interrupted; files saved before the interrupt were kept",
            "!".yellow()
        );
    }
}
