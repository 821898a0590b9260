//! Fluent builder for constructing a [`Sim`].

use hs_core::SimConfig;
use hs_event::EventQueue;
use hs_ops::{Operations, ResourceStore, Scheduler};

use crate::action::EventSink;
use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: start instant, scheduling horizon, seed
/// - [`ResourceStore`]: from [`hs_ops::ResourceStoreBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                            |
/// |-------------------|------------------------------------|
/// | `.scheduler(s)`   | `Scheduler::from_config(&config)`  |
///
/// # Example
///
/// ```rust
/// use hs_core::SimConfig;
/// use hs_ops::ResourceStoreBuilder;
/// use hs_sim::{NoopObserver, SimBuilder};
///
/// let store = ResourceStoreBuilder::new().build();
/// let mut sim = SimBuilder::new(SimConfig::default(), store).build().unwrap();
/// sim.advance_by(hs_core::Duration::HOUR, &mut NoopObserver).unwrap();
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    resources: ResourceStore,
    scheduler: Option<Scheduler>,
}

impl SimBuilder {
    pub fn new(config: SimConfig, resources: ResourceStore) -> Self {
        Self { config, resources, scheduler: None }
    }

    /// Use `scheduler` instead of one derived from the config's horizon.
    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Validate the config and return a [`Sim`] whose clock reads
    /// `config.start`, with an empty event queue.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Scheduler::from_config(&self.config));
        tracing::info!(
            start = %self.config.start,
            horizon = %scheduler.horizon(),
            resources = self.resources.len(),
            "simulation built"
        );
        let mut ops = Operations::new(self.resources, scheduler);
        ops.record_transitions();
        Ok(Sim {
            clock:  self.config.make_clock(),
            events: EventQueue::new(),
            ops,
            daily:  Vec::new(),
            sink:   EventSink::default(),
            config: self.config,
        })
    }
}
