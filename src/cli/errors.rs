//! Error display formatting for the CLI.

use crate::error::{remote_hint, Error};

/// Prints an error message, either as JSON or user-friendly format.
pub fn print_error_with_json(error: &Error, json_format: bool) {
    if !json_format {
        print_error(error);
        return;
    }
    let json_error = error.to_json();
    let Ok(json_output) = serde_json::to_string_pretty(&json_error) else {
        print_error(error);
        return;
    };
    eprintln!("{json_output}");
}

/// Prints a user-friendly error message with context and suggestions.
pub fn print_error(error: &Error) {
    match error {
        Error::RemoteError { status, body } => {
            eprintln!("{error}");
            let body = format_remote_body(body);
            if !body.is_empty() {
                eprintln!("{body}");
            }
            if let Some(hint) = remote_hint(*status) {
                eprintln!("\nHint: {hint}");
            }
        }
        Error::MissingRequiredFlags { names } => {
            eprintln!("Missing required flag(s):");
            for name in names {
                eprintln!("  -{name}");
            }
            print_hint(error);
        }
        _ => {
            eprintln!("{error}");
            print_hint(error);
        }
    }
}

fn print_hint(error: &Error) {
    if let Some(hint) = error.to_json().context {
        eprintln!("\nHint: {hint}");
    }
}

/// Pretty-prints a JSON error body; anything else is returned verbatim
#[must_use]
pub fn format_remote_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| body.trim_end().to_string())
}
