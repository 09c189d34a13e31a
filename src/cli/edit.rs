use crate::cancel::CancelToken;
use crate::config::Config;
use crate::logging::init_logging;
use crate::session::{Session, SessionOutcome};
use crate::tags::LoftyLibrary;
use crate::ui::{TerminalPrompter, output};
use owo_colors::OwoColorize;
use std::error::Error;

/// Run the interactive editing session.
///
/// Exiting from the menu and interrupting both count as success; only an
/// unusable start directory or a broken input stream is an error.
pub fn handle_edit(directory: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    match init_logging(&config) {
        Ok(path) => log::debug!("Logging to {}", path.display()),
        Err(e) => eprintln!("{} Logging disabled: {e}", "Warning:".yellow()),
    }

    let cancel = CancelToken::new();
    if let Err(e) = cancel.install_interrupt_handler() {
        log::warn!("Could not install interrupt handler: {e}");
    }

    output::print_banner();

    let library = LoftyLibrary::new();
    let mut prompter = TerminalPrompter::new(cancel.clone());
    let mut session = Session::new(&config, &library, &mut prompter, cancel);

    match session.run(directory)? {
        SessionOutcome::Exited => {
            log::info!("Session ended by user");
            println!("{}", "Bye.".bright_black());
        }
        SessionOutcome::Interrupted => log::info!("Session ended by interrupt"),
    }

    Ok(())
}
