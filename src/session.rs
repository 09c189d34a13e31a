//! The interactive menu loop.
//!
//! One [`Session`] drives any number of directory runs: scan, open, select
//! fields, plan, confirm, apply, summarize. Session state lives in
//! [`SessionContext`] and is passed explicitly rather than kept in globals.

use crate::apply::{BatchReport, apply_batch};
use crate::cancel::CancelToken;
use crate::config::Config;
use crate::constants::EXIT_CHOICE;
use crate::error::{Result, TagfixError};
use crate::plan::{EditPlan, Selection, build_plan, parse_selection};
use crate::scanner::{resolve_directory, scan_directory};
use crate::tags::TagLibrary;
use crate::ui::{Prompter, output};
use crate::utils::progress::create_progress_spinner;
use crate::workset::open_working_set;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// How a whole session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Exited,
    Interrupted,
}

/// How one directory run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryOutcome {
    NoFiles,
    NothingSelected,
    Declined,
    Completed(BatchReport),
}

#[derive(Debug, Default, Clone)]
pub struct SessionContext {
    pub directory: Option<PathBuf>,
    pub selection: Selection,
    pub plan: Option<EditPlan>,
    pub runs: usize,
}

pub struct Session<'a, L: TagLibrary, P: Prompter> {
    config: &'a Config,
    library: &'a L,
    prompter: &'a mut P,
    cancel: CancelToken,
    pub context: SessionContext,
}

impl<'a, L: TagLibrary, P: Prompter> Session<'a, L, P> {
    pub fn new(config: &'a Config, library: &'a L, prompter: &'a mut P, cancel: CancelToken) -> Self {
        Self {
            config,
            library,
            prompter,
            cancel,
            context: SessionContext::default(),
        }
    }

    /// Run the menu loop until the user exits or interrupts.
    ///
    /// A directory passed in `initial_dir` that does not resolve is fatal;
    /// one typed at the prompt is reported and asked for again.
    pub fn run(&mut self, initial_dir: Option<&str>) -> Result<SessionOutcome> {
        match self.run_loop(initial_dir) {
            Err(TagfixError::UserInterrupt) => {
                log::info!("Session interrupted after {} run(s)", self.context.runs);
                println!("\n{}", "Interrupted. Exiting...".yellow());
                Ok(SessionOutcome::Interrupted)
            }
            other => other,
        }
    }

    fn run_loop(&mut self, initial_dir: Option<&str>) -> Result<SessionOutcome> {
        let mut pending_dir = initial_dir.map(str::to_string);

        loop {
            let from_cli = pending_dir.is_some();
            let input = match pending_dir.take() {
                Some(dir) => dir,
                None => {
                    self.cancel.checkpoint()?;
                    self.prompter.input("Directory (0 to exit)")?
                }
            };
            let input = input.trim();

            if input == EXIT_CHOICE {
                return Ok(SessionOutcome::Exited);
            }
            if input.is_empty() {
                continue;
            }

            let dir = match resolve_directory(input) {
                Ok(dir) => dir,
                Err(err) if err.is_recoverable() && !from_cli => {
                    output::print_error(&err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            self.edit_directory(&dir)?;

            self.cancel.checkpoint()?;
            let choice = self
                .prompter
                .input("Enter to edit another directory, 0 to exit")?;
            if choice.trim() == EXIT_CHOICE {
                return Ok(SessionOutcome::Exited);
            }
        }
    }

    /// One full pass over a directory.
    pub fn edit_directory(&mut self, dir: &Path) -> Result<DirectoryOutcome> {
        self.context.directory = Some(dir.to_path_buf());
        self.context.selection = Selection::default();
        self.context.plan = None;
        self.context.runs += 1;

        let candidates = scan_directory(dir, &self.config.scan_options())?;
        if candidates.is_empty() {
            output::print_no_files(dir);
            return Ok(DirectoryOutcome::NoFiles);
        }
        output::print_found(candidates.len(), dir);

        let spinner = create_progress_spinner();
        spinner.set_message("Reading tags...");
        let mut set = open_working_set(self.library, &candidates);
        spinner.finish_and_clear();

        if set.is_empty() {
            let report = apply_batch(set, &self.cancel);
            output::print_summary(&report);
            return Ok(DirectoryOutcome::Completed(report));
        }

        let selection = self.select_fields()?;
        if selection.is_empty() {
            println!("{}", "No fields selected.".bright_black());
            return Ok(DirectoryOutcome::NothingSelected);
        }
        self.context.selection = selection.clone();

        let plan = build_plan(
            &mut *self.prompter,
            &mut set.files,
            &selection,
            &self.cancel,
            self.config.show_value_summary,
        )?;
        self.context.plan = Some(plan);

        let pending = set.pending_writes();
        if pending > 0 && self.config.confirm_before_apply {
            self.cancel.checkpoint()?;
            let proceed = self.prompter.confirm(
                &format!(
                    "Write {pending} change(s) to {} file(s)?",
                    set.files_with_pending()
                ),
                true,
            )?;
            if !proceed {
                set.clear_pending();
                println!("{}", "Nothing written.".bright_black());
                return Ok(DirectoryOutcome::Declined);
            }
        }

        self.cancel.checkpoint()?;
        let report = apply_batch(set, &self.cancel);
        output::print_summary(&report);

        if report.interrupted {
            return Err(TagfixError::UserInterrupt);
        }
        Ok(DirectoryOutcome::Completed(report))
    }

    /// Field menu. Re-prompts on invalid numbers; empty input means none.
    fn select_fields(&mut self) -> Result<Selection> {
        output::print_field_menu();
        loop {
            self.cancel.checkpoint()?;
            let input = self.prompter.input("Fields")?;
            match parse_selection(&input) {
                Ok(fields) => return Ok(fields),
                Err(err) if err.is_recoverable() => output::print_error(&err),
                Err(err) => return Err(err),
            }
        }
    }
}
