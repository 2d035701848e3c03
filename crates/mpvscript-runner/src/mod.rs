mod bridge_runner;
pub mod event_bus;
mod instance;
pub mod logging;

pub use bridge_runner::{BridgeRunner, DEFAULT_BUS_CAPACITY, RunnerError};
pub use event_bus::{EventBus, EventEnvelope, EventSender, EventSource};
pub use instance::{InstanceReport, run_instance};
pub use logging::init_logging;
