//! Session state record and the presence-channel phase machine.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::types::AuthUser;

/// Presence-channel connection phase.
///
/// Connect and disconnect both transition through an intermediate phase
/// under the store lock, so a concurrent second attempt observes the
/// in-progress phase and backs off instead of racing a guard-then-open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelPhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

/// Snapshot of the session record published to observers.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Present iff a session is currently authenticated.
    pub auth_user: Option<AuthUser>,
    /// True while a signup request is in flight.
    pub is_signing_up: bool,
    /// True while a login request is in flight.
    pub is_logging_in: bool,
    /// True while a profile update is in flight.
    pub is_updating_profile: bool,
    /// True from construction until the first auth check completes; cleared
    /// exactly once, never set again.
    pub is_checking_auth: bool,
    /// User ids currently online, replaced wholesale on each presence event.
    pub online_users: Vec<String>,
    /// Phase of the presence channel.
    pub channel: ChannelPhase,
}

impl SessionState {
    /// Initial state: unauthenticated, auth check pending, no channel.
    #[must_use]
    pub fn new() -> Self {
        Self { is_checking_auth: true, ..Self::default() }
    }
}
