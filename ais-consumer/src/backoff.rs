use std::time::Duration;

use crate::settings::ReconnectSettings;

/// Where the connection manager currently is in its connect/reconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectState {
    Disconnected,
    Connected { received_data: bool },
    BackoffPending { delay: Duration },
}

/// Binary outcome exponential backoff.
///
/// A connection cycle that decoded at least one frame resets the delay to the base value, a
/// cycle that produced nothing doubles it up to the configured maximum.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    delay: Duration,
    state: ReconnectState,
}

impl Backoff {
    pub fn new(settings: &ReconnectSettings) -> Backoff {
        Backoff {
            base: settings.base_delay,
            max: settings.max_delay,
            delay: settings.base_delay,
            state: ReconnectState::Disconnected,
        }
    }

    pub fn state(&self) -> ReconnectState {
        self.state
    }

    pub fn connected(&mut self) {
        self.state = ReconnectState::Connected {
            received_data: false,
        };
    }

    pub fn data_received(&mut self) {
        if let ReconnectState::Connected { received_data } = &mut self.state {
            *received_data = true;
        }
    }

    /// Ends the current cycle and settles the delay for the next attempt. A cycle that never got
    /// past the handshake counts as one that produced nothing.
    pub fn disconnected(&mut self) {
        match self.state {
            ReconnectState::Connected {
                received_data: true,
            } => {
                self.delay = self.base;
            }
            ReconnectState::Connected {
                received_data: false,
            }
            | ReconnectState::Disconnected => {
                self.delay = self.delay.saturating_mul(2).min(self.max);
            }
            ReconnectState::BackoffPending { .. } => return,
        }
        self.state = ReconnectState::Disconnected;
    }

    /// Returns the delay to wait before reconnecting, or `None` if a reconnect is already pending.
    pub fn schedule(&mut self) -> Option<Duration> {
        match self.state {
            ReconnectState::BackoffPending { .. } => None,
            _ => Some(self.pending_delay()),
        }
    }

    /// Schedules a reconnect unless one is already pending and returns the delay of the pending
    /// reconnect, so the caller always waits before connecting again.
    pub fn pending_delay(&mut self) -> Duration {
        match self.state {
            ReconnectState::BackoffPending { delay } => delay,
            _ => {
                self.state = ReconnectState::BackoffPending { delay: self.delay };
                self.delay
            }
        }
    }

    /// The pending reconnect timer has elapsed.
    pub fn fire(&mut self) {
        if let ReconnectState::BackoffPending { .. } = self.state {
            self.state = ReconnectState::Disconnected;
        }
    }
}
