//! Plugin startup: waiting for the host and wiring up the menu item.
//!
//! The host either tells the plugin it is ready ([`ReadinessGate::notify_ready`])
//! or gets polled. Polling follows a bounded exponential backoff and gives
//! up after a fixed number of attempts.

use std::time::Duration;

use log::{debug, info, warn};

use crate::host::DocumentHost;
use crate::menu::CenterOfMass4DMenuItem;
use crate::registry;

/// Extension id of the plugin.
pub const EXTENSION_ID: &str = "com4d.extension.center_of_mass_4d";

/// Backoff schedule for polling host readiness.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the second poll.
    pub initial_delay: Duration,
    /// Factor applied to the delay after each failed poll.
    pub backoff_factor: f64,
    /// Upper bound of the delay.
    pub max_delay: Duration,
    /// Polls before giving up.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(8),
            max_attempts: 10,
        }
    }
}

impl RetryPolicy {
    /// Set initial delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set backoff factor.
    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set max delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set max attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay after `delay`, capped at `max_delay`.
    fn next_delay(&self, delay: Duration) -> Duration {
        delay.mul_f64(self.backoff_factor.max(1.0)).min(self.max_delay)
    }
}

/// Outcome of a readiness poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Not ready yet; poll again after the delay.
    RetryAfter(Duration),
    /// Not ready after `max_attempts` polls.
    GaveUp,
}

/// Tracks whether the host is ready and the polling schedule.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    policy: RetryPolicy,
    attempts: u32,
    delay: Duration,
    ready: bool,
}

impl Default for ReadinessGate {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl ReadinessGate {
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        let delay = policy.initial_delay.min(policy.max_delay);
        Self {
            policy,
            attempts: 0,
            delay,
            ready: false,
        }
    }

    /// Marks the host ready.
    pub fn notify_ready(&mut self) {
        self.ready = true;
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Polls made without the host being ready.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Checks the host once and advances the backoff schedule.
    pub fn poll(&mut self, host: &dyn DocumentHost) -> Readiness {
        if self.ready || host.is_ready() {
            self.ready = true;
            return Readiness::Ready;
        }
        self.attempts += 1;
        if self.attempts >= self.policy.max_attempts {
            warn!("host not ready after {} poll(s); giving up", self.attempts);
            return Readiness::GaveUp;
        }
        let delay = self.delay;
        self.delay = self.policy.next_delay(delay);
        debug!("host not ready (poll {}); retrying in {delay:?}", self.attempts);
        Readiness::RetryAfter(delay)
    }
}

/// The plugin as installed into the host.
#[derive(Debug, Default)]
pub struct CenterOfMass4DExtension {
    menu_item: CenterOfMass4DMenuItem,
    gate: ReadinessGate,
    initialized: bool,
}

impl CenterOfMass4DExtension {
    /// Creates the extension and makes sure the computation registry is
    /// installed.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        registry::init();
        info!("{EXTENSION_ID} loaded");
        Self {
            menu_item: CenterOfMass4DMenuItem::new(),
            gate: ReadinessGate::new(policy),
            initialized: false,
        }
    }

    #[must_use]
    pub fn menu_item(&self) -> &CenterOfMass4DMenuItem {
        &self.menu_item
    }

    pub fn menu_item_mut(&mut self) -> &mut CenterOfMass4DMenuItem {
        &mut self.menu_item
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The host reports it is ready.
    pub fn host_ready(&mut self, host: &mut dyn DocumentHost) {
        self.gate.notify_ready();
        self.initialize(host);
    }

    /// Polls the host; initializes the menu item once it is ready.
    pub fn poll(&mut self, host: &mut dyn DocumentHost) -> Readiness {
        let readiness = self.gate.poll(host);
        if readiness == Readiness::Ready {
            self.initialize(host);
        }
        readiness
    }

    fn initialize(&mut self, host: &mut dyn DocumentHost) {
        if self.initialized {
            return;
        }
        self.menu_item.init(host);
        self.initialized = true;
    }
}
