pub mod checkin;
pub mod controller;
pub mod error;
pub mod import;
pub mod state;

pub use controller::{MutationOutcome, RosterController};
pub use error::{Result, RosterError};
pub use import::generate_access_code;
pub use state::{RosterSnapshot, RosterState};
