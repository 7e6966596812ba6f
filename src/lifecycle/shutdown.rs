//! Shutdown coordination.

use tokio_util::sync::CancellationToken;

/// Which stage a call to [`Shutdown::trigger`] reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStage {
    /// Stop starting work, let in-flight work finish.
    Graceful,
    /// Cancel in-flight work too.
    Forced,
}

/// Coordinator for graceful shutdown.
///
/// Holds the root cancellation token that every long-running task observes.
/// The first trigger cancels it; a second trigger also cancels the force
/// token, which in-flight probes observe. Neither is ever reset.
#[derive(Debug, Clone)]
pub struct Shutdown {
    graceful: CancellationToken,
    force: CancellationToken,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let force = CancellationToken::new();
        // Forcing implies graceful: the root token is a child of force.
        let graceful = force.child_token();
        Self { graceful, force }
    }

    /// The root token: fires on the first trigger.
    pub fn token(&self) -> CancellationToken {
        self.graceful.clone()
    }

    /// Fires on the second trigger.
    pub fn force_token(&self) -> CancellationToken {
        self.force.clone()
    }

    /// Trigger the shutdown signal, escalating on repeat calls.
    pub fn trigger(&self) -> ShutdownStage {
        if self.graceful.is_cancelled() {
            self.force.cancel();
            ShutdownStage::Forced
        } else {
            self.graceful.cancel();
            ShutdownStage::Graceful
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.graceful.is_cancelled()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_escalates() {
        let shutdown = Shutdown::new();
        let root = shutdown.token();
        let force = shutdown.force_token();

        assert_eq!(shutdown.trigger(), ShutdownStage::Graceful);
        assert!(root.is_cancelled());
        assert!(!force.is_cancelled());

        assert_eq!(shutdown.trigger(), ShutdownStage::Forced);
        assert!(force.is_cancelled());
        assert_eq!(shutdown.trigger(), ShutdownStage::Forced);
    }

    #[test]
    fn test_clones_share_state() {
        let shutdown = Shutdown::new();
        let observer = shutdown.clone();
        shutdown.trigger();
        assert!(observer.is_triggered());
    }
}
