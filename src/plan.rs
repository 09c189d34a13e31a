//! Field selection and edit planning.
//!
//! Planning stages values into each file's pending map; nothing touches a
//! handle until the batch is applied.

use crate::analysis::value_distribution;
use crate::cancel::CancelToken;
use crate::constants::{COVER_CHOICE, NOT_SET};
use crate::cover::CoverImage;
use crate::error::{Result, TagfixError};
use crate::tags::{TagField, TagHandle};
use crate::ui::{Prompter, output};
use crate::workset::AudioFile;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum EditMode {
    /// One literal value for every file. May be empty, which clears the field.
    Global(String),
    PerFile,
    /// Leave the field unchanged
    Skip,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditPlan {
    entries: Vec<(TagField, EditMode)>,
    cover: Option<PathBuf>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: TagField, mode: EditMode) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = mode,
            None => self.entries.push((field, mode)),
        }
    }

    pub fn mode(&self, field: TagField) -> Option<&EditMode> {
        self.entries.iter().find(|(f, _)| *f == field).map(|(_, m)| m)
    }

    pub fn entries(&self) -> &[(TagField, EditMode)] {
        &self.entries
    }

    pub fn set_cover(&mut self, path: PathBuf) {
        self.cover = Some(path);
    }

    /// Image chosen as the front cover, if any.
    pub fn cover(&self) -> Option<&PathBuf> {
        self.cover.as_ref()
    }

    /// True when every field is skipped and no cover was chosen.
    pub fn is_noop(&self) -> bool {
        self.cover.is_none() && self.entries.iter().all(|(_, m)| *m == EditMode::Skip)
    }
}

/// What the field menu asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub fields: Vec<TagField>,
    pub cover: bool,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && !self.cover
    }
}

/// Parse the field menu input: numbers separated by commas and/or spaces,
/// `c` for the cover image, or `all` for every text field. Empty input
/// yields an empty selection.
pub fn parse_selection(input: &str) -> Result<Selection> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return Ok(Selection {
            fields: TagField::ALL.to_vec(),
            cover: false,
        });
    }

    let mut selection = Selection::default();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token.eq_ignore_ascii_case(COVER_CHOICE) {
            selection.cover = true;
            continue;
        }
        let field = token
            .parse::<usize>()
            .ok()
            .and_then(TagField::from_menu_number)
            .ok_or_else(|| {
                TagfixError::InvalidMenuInput(format!(
                    "'{token}' is not a field number between 1 and {} or '{COVER_CHOICE}'",
                    TagField::ALL.len()
                ))
            })?;
        if !selection.fields.contains(&field) {
            selection.fields.push(field);
        }
    }

    Ok(selection)
}

/// A reply in the per-file prompt loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PerFileAnswer {
    Value(String),
    SkipFile,
    CancelRemaining,
}

pub fn parse_per_file_input(input: &str) -> PerFileAnswer {
    let trimmed = input.trim();
    match trimmed {
        "" | ":s" | ":skip" => PerFileAnswer::SkipFile,
        ":q" | ":cancel" => PerFileAnswer::CancelRemaining,
        ":clear" => PerFileAnswer::Value(String::new()),
        value => PerFileAnswer::Value(value.to_string()),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerFileOutcome {
    pub entered: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

const MODE_GLOBAL: usize = 0;
const MODE_PER_FILE: usize = 1;
const MODE_SKIP: usize = 2;

fn mode_items(file_count: usize) -> Vec<String> {
    vec![
        format!("Global value for all {file_count} file(s)"),
        "Per-file values".to_string(),
        "Skip (leave unchanged)".to_string(),
    ]
}

/// Stage `value` for `field` on every file.
pub fn stage_global<H: TagHandle>(files: &mut [AudioFile<H>], field: TagField, value: &str) {
    for file in files {
        file.stage(field, value);
    }
}

/// Ask for a value for `field` file by file, in working-set order.
///
/// Cancelling keeps the values entered so far and stops asking for the
/// remaining files.
pub fn collect_per_file<P: Prompter, H: TagHandle>(
    prompter: &mut P,
    files: &mut [AudioFile<H>],
    field: TagField,
    cancel: &CancelToken,
) -> Result<PerFileOutcome> {
    let total = files.len();
    let mut outcome = PerFileOutcome::default();

    output::print_per_file_help(field);

    for (index, file) in files.iter_mut().enumerate() {
        cancel.checkpoint()?;

        let current = file.current(field);
        output::print_per_file_header(index + 1, total, &file.file_name(), field, current.as_deref());

        let reply = prompter.input(&format!("New {}", field.label()))?;
        match parse_per_file_input(&reply) {
            PerFileAnswer::Value(value) => {
                file.stage(field, value);
                outcome.entered += 1;
            }
            PerFileAnswer::SkipFile => outcome.skipped += 1,
            PerFileAnswer::CancelRemaining => {
                log::info!(
                    "Per-file entry for {field} cancelled at file {}/{total}",
                    index + 1
                );
                outcome.cancelled = true;
                break;
            }
        }
    }

    Ok(outcome)
}

/// Choose the mode for one field and stage its values.
pub fn plan_field<P: Prompter, H: TagHandle>(
    prompter: &mut P,
    files: &mut [AudioFile<H>],
    field: TagField,
    cancel: &CancelToken,
) -> Result<EditMode> {
    cancel.checkpoint()?;

    let default = if field.is_album_level() {
        MODE_GLOBAL
    } else {
        MODE_PER_FILE
    };
    let choice = prompter.select(
        &format!("Global value for {}, or per-file?", field.label()),
        &mode_items(files.len()),
        default,
    )?;

    match choice {
        MODE_GLOBAL => {
            let value = prompter.input(&format!("New {} for all files", field.label()))?;
            if value.is_empty() {
                let clear = prompter.confirm(
                    &format!(
                        "Clear {} on all {} file(s)? (No leaves it unchanged)",
                        field.label(),
                        files.len()
                    ),
                    false,
                )?;
                if !clear {
                    return Ok(EditMode::Skip);
                }
            }
            stage_global(files, field, &value);
            Ok(EditMode::Global(value))
        }
        MODE_PER_FILE => {
            let outcome = collect_per_file(prompter, files, field, cancel)?;
            output::print_per_file_outcome(field, &outcome);
            Ok(EditMode::PerFile)
        }
        MODE_SKIP => Ok(EditMode::Skip),
        other => Err(TagfixError::InvalidMenuInput(format!(
            "unknown mode choice {other}"
        ))),
    }
}

/// Ask for a local cover image and stage it on every file.
///
/// Empty input or a declined preview leaves covers unchanged. Unusable
/// images are reported and asked for again.
pub fn plan_cover<P: Prompter, H: TagHandle>(
    prompter: &mut P,
    files: &mut [AudioFile<H>],
    cancel: &CancelToken,
) -> Result<Option<Rc<CoverImage>>> {
    let existing = files.iter().filter(|f| f.handle.has_cover()).count();
    output::print_cover_status(existing, files.len());

    loop {
        cancel.checkpoint()?;
        let input = prompter.input("Cover image path (empty to skip)")?;
        if input.trim().is_empty() {
            return Ok(None);
        }

        let cover = match CoverImage::load(&input) {
            Ok(cover) => cover,
            Err(err) if err.is_recoverable() => {
                output::print_error(&err);
                continue;
            }
            Err(err) => return Err(err),
        };

        output::print_cover_details(&cover);
        let embed = prompter.confirm(
            &format!("Embed this cover into {} file(s)?", files.len()),
            true,
        )?;
        if !embed {
            return Ok(None);
        }

        let cover = Rc::new(cover);
        for file in files.iter_mut() {
            file.stage_cover(Rc::clone(&cover));
        }
        return Ok(Some(cover));
    }
}

/// Plan the cover, then every selected field in selection order.
pub fn build_plan<P: Prompter, H: TagHandle>(
    prompter: &mut P,
    files: &mut [AudioFile<H>],
    selection: &Selection,
    cancel: &CancelToken,
    show_value_summary: bool,
) -> Result<EditPlan> {
    let mut plan = EditPlan::new();

    if selection.cover
        && let Some(cover) = plan_cover(prompter, files, cancel)?
    {
        log::debug!("Planned cover {}", cover.path.display());
        plan.set_cover(cover.path.clone());
    }

    for &field in &selection.fields {
        if show_value_summary {
            output::print_value_distribution(field, &value_distribution(files, field), files.len());
        }
        let mode = plan_field(prompter, files, field, cancel)?;
        log::debug!("Planned {field}: {mode:?}");
        plan.set(field, mode);
    }

    Ok(plan)
}

/// Display form of an optional current value.
pub fn display_value(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_SET,
    }
}
