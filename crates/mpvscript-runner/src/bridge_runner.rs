use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info};

use mpvscript_events::{EventId, HostEvent};
use mpvscript_scripting_host::{ScriptContext, ScriptRunner};

use crate::event_bus::{EventBus, EventSender, EventSource};
use crate::instance::{InstanceReport, run_instance};

/// Default capacity of the host event bus
pub const DEFAULT_BUS_CAPACITY: usize = 256;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("script instance task failed: {0}")]
    Join(#[from] JoinError),
}

/// Runs every loaded script instance on its own task, fed from one bus
pub struct BridgeRunner {
    bus: EventBus,
    host_sender: EventSender,
    tasks: Vec<JoinHandle<InstanceReport>>,
}

impl BridgeRunner {
    /// Spawn one pump per loaded script. Must be called within a tokio runtime.
    pub fn start(runner: ScriptRunner, capacity: usize) -> Self {
        let contexts = runner
            .into_instances()
            .into_iter()
            .map(|instance| {
                debug!(target: "events", "Starting {} from {}", instance.context.identity(), instance.path.display());
                instance.context
            })
            .collect();
        Self::from_contexts(contexts, capacity)
    }

    /// Spawn one pump per context
    pub fn from_contexts(contexts: Vec<ScriptContext>, capacity: usize) -> Self {
        let bus = EventBus::new(capacity);
        let tasks: Vec<_> = contexts
            .into_iter()
            .map(|context| tokio::spawn(run_instance(context, bus.subscribe())))
            .collect();
        info!(target: "events", "Started {} script instance(s)", tasks.len());

        Self {
            host_sender: bus.create_sender(EventSource::Host),
            bus,
            tasks,
        }
    }

    /// Sender for the host side; clone it freely
    pub fn sender(&self) -> EventSender {
        self.host_sender.clone()
    }

    pub fn instance_count(&self) -> usize {
        self.tasks.len()
    }

    /// Publish a shutdown and wait for every instance to stop
    pub async fn shutdown(self) -> Result<Vec<InstanceReport>, RunnerError> {
        self.bus
            .create_sender(EventSource::Runner)
            .publish(HostEvent::shutdown());
        self.join().await
    }

    async fn join(self) -> Result<Vec<InstanceReport>, RunnerError> {
        let mut reports = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            reports.push(task.await?);
        }
        Ok(reports)
    }

    /// Forward host events to the instances until the host sends a
    /// shutdown or its channel closes
    pub async fn run(self, mut events: UnboundedReceiver<HostEvent>) -> Result<Vec<InstanceReport>, RunnerError> {
        while let Some(event) = events.recv().await {
            let shutdown = event.is(EventId::Shutdown);
            self.host_sender.publish(event);
            if shutdown {
                return self.join().await;
            }
        }
        debug!(target: "events", "Host event channel closed");
        self.shutdown().await
    }
}
