//! Styled terminal output.

use crossterm::style::Stylize;

use eventdesk_core::models::{Event, User};
use eventdesk_core::{IneligibleOrganizer, Locale};

pub fn title(text: &str) {
    println!("{}", text.bold().underlined());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn requirements(event: &Event, required: &[&str]) {
    title(&event.name);
    if required.is_empty() {
        println!("{}", "No qualification required".dark_grey());
        return;
    }
    for slug in required {
        println!("  {}", (*slug).cyan());
    }
}

pub fn decision(
    event: &Event,
    user: &User,
    decision: &Result<(), IneligibleOrganizer>,
    locale: Locale,
) {
    println!(
        "{} {} {}",
        user.name().bold(),
        "→".dark_grey(),
        event.name.as_str().bold()
    );
    match decision {
        Ok(()) => println!("{}", locale.eligible_text().green().bold()),
        Err(e) => println!("{} {}", "✗".red().bold(), e.reason.as_str().red()),
    }
}
