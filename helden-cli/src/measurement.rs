use colored::Colorize;
use helden_lib::{Error, Session};

use crate::view;

pub fn start(session: &mut Session, weight: &str, code: &str) {
    session.set_pending_weight(weight);

    let result = session.commit_pending_start_weight(code).map(|_| ());
    match result {
        // A missing code is reported through the session's status message
        Ok(()) | Err(Error::MissingCode) => view::print_message(session),
        Err(err) => eprintln!("{} {err}", "error:".red().bold()),
    }
}

pub fn measure(session: &mut Session, weight: &str) {
    session.set_pending_weight(weight);

    if let Err(err) = session.add_pending_measurement().map(|_| ()) {
        eprintln!("{} {err}", "error:".red().bold());
        return;
    }

    if let Some(latest) = session.derive_active().last() {
        println!(
            "Recorded measurement: {} since last, {} since start",
            view::colored_change(latest.change_from_prev()),
            view::colored_change(latest.change_from_start()),
        );
    }
}
