//! Communication with the AppLand server and with recording agents.

pub mod client;
pub mod recording;
pub mod types;

pub use client::{build_url, Api, ApplandClient};
pub use recording::{RecordingClient, StartOutcome};
pub use types::{CreateMapSetResponse, MapSet, ScenarioResponse};
