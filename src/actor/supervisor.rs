use std::time::{Duration, Instant};

use crate::actor::actor_ref::BasicActorRef;
use crate::actor::Strategy;

/// Per-actor failure counter with timestamps, consulted by supervision
/// strategies to decide whether a child has failed too often to be
/// worth restarting.
#[derive(Clone, Debug, Default)]
pub struct RestartStatistics {
    failures: Vec<Instant>,
}

impl RestartStatistics {
    pub fn new() -> Self {
        RestartStatistics::default()
    }

    pub fn fail(&mut self) {
        self.failures.push(Instant::now());
    }

    pub fn fail_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of failures recorded within the last `window`.
    pub fn fail_count_within(&self, window: Duration) -> usize {
        let now = Instant::now();
        self.failures
            .iter()
            .filter(|at| now.saturating_duration_since(**at) <= window)
            .count()
    }

    pub fn reset(&mut self) {
        self.failures.clear();
    }
}

/// Pluggable failure-handling policy, consulted whenever a child actor's
/// `Failure` system message reaches its parent (or the actor itself, if
/// it implements its own strategy via `Actor::supervisor_strategy`).
pub trait SupervisorStrategy: Send + Sync {
    fn handle_failure(
        &self,
        who: &BasicActorRef,
        stats: &mut RestartStatistics,
        reason: &str,
    ) -> Strategy;
}

/// The default strategy named in `Actor::supervisor_strategy`: always
/// restart, regardless of failure history.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysRestart;

impl SupervisorStrategy for AlwaysRestart {
    fn handle_failure(
        &self,
        _who: &BasicActorRef,
        stats: &mut RestartStatistics,
        _reason: &str,
    ) -> Strategy {
        stats.fail();
        Strategy::Restart
    }
}

/// Restarts a child up to `max_retries` times within `within`; escalates
/// once the budget is exhausted.
#[derive(Clone, Copy, Debug)]
pub struct RestartWithBackoff {
    pub max_retries: usize,
    pub within: Duration,
}

impl SupervisorStrategy for RestartWithBackoff {
    fn handle_failure(
        &self,
        _who: &BasicActorRef,
        stats: &mut RestartStatistics,
        _reason: &str,
    ) -> Strategy {
        stats.fail();
        if stats.fail_count_within(self.within) > self.max_retries {
            Strategy::Escalate
        } else {
            Strategy::Restart
        }
    }
}
