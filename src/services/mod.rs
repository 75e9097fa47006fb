pub mod events;
pub mod location;
pub mod request_sequencer;
pub mod search_orchestrator;

pub use events::{EventOutcome, GeoEvent, GeoEventKind};
pub use location::{ConfiguredLocationProvider, LocationProvider, PermissionStatus};
pub use request_sequencer::{RequestKind, RequestSequencer};
pub use search_orchestrator::{MountOutcome, OrchestratorSettings, SearchOrchestrator};
