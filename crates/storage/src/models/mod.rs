mod athlete;
mod progress;
mod workout_log;

pub use athlete::{Athlete, AthletePatch, NewAthlete, PaymentStatus};
pub use progress::ProgressSample;
pub use workout_log::WorkoutLog;
