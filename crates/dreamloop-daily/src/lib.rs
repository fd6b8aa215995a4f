//! The daily pass: decide who is due, materialize their card, push it.

pub mod adapters;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod ports;

pub use adapters::PgStore;
pub use dispatch::{DispatchReport, PushDispatcher};
pub use error::DailyError;
pub use orchestrator::DailyOrchestrator;
pub use outcome::{RunOutcome, RunResult, RunTotals};
pub use ports::{
    Collaborators, ContentStore, DeviceDirectory, ProfileSource, PushTransport, TextGenerator,
    WeatherSource,
};
