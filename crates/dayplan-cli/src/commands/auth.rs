//! Calendar credential commands.
//!
//! Token acquisition happens outside this tool; whatever produced a
//! bearer token, this stores it in the OS keyring for the calendar
//! client to pick up.

use clap::Subcommand;
use dayplan_core::calendar::{clear_token, store_token, KeyringTokenProvider, TokenProvider};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a calendar API bearer token in the OS keyring
    SetToken {
        /// The bearer token
        token: String,
    },
    /// Show whether a token is stored
    Status,
    /// Remove the stored token
    Clear,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::SetToken { token } => {
            store_token(&token)?;
            println!("Token stored.");
        }
        AuthAction::Status => match KeyringTokenProvider::new().access_token() {
            Ok(_) => println!("Token present."),
            Err(e) => println!("No usable token: {e}"),
        },
        AuthAction::Clear => {
            clear_token()?;
            println!("Token removed.");
        }
    }

    Ok(())
}
