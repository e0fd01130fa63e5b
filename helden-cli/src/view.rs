use colored::{ColoredString, Colorize};
use helden_lib::{
    Session, View,
    derivation::{Trend, format_change},
};

const HIDDEN: &str = "***";

pub fn print(view: &View, session: &Session) {
    let Some(profile) = &view.profile else {
        println!("No profiles yet. Add one with `profile add <name>`.");
        return;
    };

    println!("{} (#{})", profile.name().bold(), profile.id());

    if view.needs_start_weight {
        println!("No start weight yet. Set one with `start <weight> <code>`.");
    } else {
        let start = view
            .start_weight
            .map_or_else(|| HIDDEN.to_string(), |w| format!("{w} kg"));
        println!("Start weight: {start}  (weights {})", view.gate);
    }

    if !view.records.is_empty() {
        println!(
            "{:<12} {:>10} {:>10} {:>10}",
            "Date".underline(),
            "Weight".underline(),
            "vs prev".underline(),
            "vs start".underline()
        );
    }
    for record in &view.records {
        let weight = record
            .display_weight()
            .map_or_else(|| HIDDEN.to_string(), |w| w.to_string());
        println!(
            "{:<12} {:>10} {:>10} {:>10}",
            record.date().to_string(),
            weight,
            colored_change(record.change_from_prev()),
            colored_change(record.change_from_start()),
        );
    }

    print_message(session);
}

pub fn print_message(session: &Session) {
    if let (Some(status), Some(text)) = (session.message(), session.message_text()) {
        if status.is_error() {
            println!("{}", text.red());
        } else {
            println!("{}", text.green());
        }
    }
}

/// Losses are shown in green, gains in red.
pub fn colored_change(change: f64) -> ColoredString {
    let text = format_change(change);
    match Trend::of(change) {
        Trend::Down => text.green(),
        Trend::Up => text.red(),
    }
}
