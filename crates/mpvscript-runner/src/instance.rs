use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info};

use mpvscript_events::{ClientIdentity, EventId};
use mpvscript_scripting_host::{Dispatch, ScriptContext};

use crate::event_bus::EventEnvelope;

/// What one instance did before its pump stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceReport {
    pub identity: ClientIdentity,
    pub events: u64,
    pub invoked: u64,
    pub failed: u64,
    /// Events dropped because the instance fell behind the bus
    pub skipped: u64,
}

/// Pump events from the bus into one script instance until the host shuts
/// down or the bus closes. Callbacks run inline on this task, so a slow
/// callback only holds up this instance.
pub async fn run_instance(
    mut context: ScriptContext,
    mut rx: broadcast::Receiver<EventEnvelope>,
) -> InstanceReport {
    let mut report = InstanceReport {
        identity: context.identity().clone(),
        events: 0,
        invoked: 0,
        failed: 0,
        skipped: 0,
    };
    info!(target: "events", "Script instance {} started", report.identity);

    loop {
        match rx.recv().await {
            Ok(envelope) => {
                report.events += 1;
                match context.process_event(&envelope.event) {
                    Dispatch::Invoked(_) => report.invoked += 1,
                    Dispatch::Failed(_) => report.failed += 1,
                    _ => {}
                }

                if envelope.event.is(EventId::Shutdown) {
                    info!(target: "events", "Script instance {} received shutdown", report.identity);
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                error!(target: "events", "Script instance {} lagged, {} events were skipped", report.identity, skipped);
                report.skipped += skipped;
            }
            Err(RecvError::Closed) => {
                debug!(target: "events", "Event channel closed for {}", report.identity);
                break;
            }
        }
    }

    report
}
