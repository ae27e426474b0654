use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ExperimentConfig;
use crate::events::{ActorEvent, EventKind, EventSink};
use crate::resource::Resource;
use crate::types::{ActorId, SignalingMode};

/// Everything the actors of one run share. Built fresh by the orchestrator
/// for each run and dropped after aggregation.
pub struct RunContext {
    pub config: ExperimentConfig,
    pub resource: Resource,
    pub sink: Arc<dyn EventSink>,
    /// Zero point for event timestamps
    pub epoch: Instant,
}

impl RunContext {
    pub fn new(config: ExperimentConfig, sink: Arc<dyn EventSink>) -> Self {
        let resource = Resource::new(config.lock_probability);
        Self {
            config,
            resource,
            sink,
            epoch: Instant::now(),
        }
    }

    pub fn signaling(&self) -> SignalingMode {
        self.config.signaling
    }

    pub fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    pub fn emit(&self, actor: ActorId, kind: EventKind) {
        self.sink.record(&ActorEvent {
            actor,
            at: self.elapsed(),
            kind,
        });
    }
}
