use strum::{EnumMessage, IntoEnumIterator};

use crate::models::session::Session;

/// Prints the session table with default-set markers.
pub fn run() {
    println!("\nSessions:\n");
    println!("  {:<26} {:<55}", "Name", "Description");
    println!("{:-<85}", "");

    for session in Session::iter() {
        let marker = if session.is_default() { "*" } else { " " };
        let description = session.get_message().unwrap_or("No description provided");
        println!("{marker} {:<26} {description}", session.to_string());
    }

    println!("\n* runs by default when no session is given\n");
}
