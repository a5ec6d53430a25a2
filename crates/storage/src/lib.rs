pub mod adapter;
pub mod error;
pub mod models;

pub use adapter::{
    ATHLETE_PROGRESS_TABLE, ATHLETES_TABLE, BackendAdapter, BackendConfig, InMemoryAdapter,
    OrderBy, RemoteAdapter, SelectQuery, WORKOUT_LOGS_TABLE, adapter_from_env,
};
pub use error::{Result, StorageError};
pub use models::{Athlete, AthletePatch, NewAthlete, PaymentStatus, ProgressSample, WorkoutLog};
