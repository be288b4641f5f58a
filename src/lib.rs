//! Session and presence state for the chat client.
//!
//! ARCHITECTURE
//! ============
//! One component, [`SessionStore`], owns the whole session record: the
//! authenticated user, per-action loading flags, and the online-user list
//! fed by a realtime presence channel. Each store operation performs at most
//! one network call and then deterministically updates the record.
//!
//! Collaborators are trait seams so every behavior is testable with mocks:
//! [`AuthTransport`] for the `/auth/*` HTTP endpoints, [`PresenceConnector`]
//! for the websocket presence channel, and [`Notifier`] for user-facing
//! toasts.
//!
//! ERROR HANDLING
//! ==============
//! The store is the terminal handler for every failure: nothing propagates
//! to callers. Errors become either a notification (mutating actions) or a
//! log line (`check_auth`), with server-provided messages surfaced through
//! [`TransportError::user_message`].

pub mod config;
pub mod error;
pub mod notify;
pub mod presence;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use config::SessionConfig;
pub use error::{ApiFailure, PresenceError, TransportError};
pub use notify::{LogNotifier, Notifier};
pub use presence::{OnlineUsersFn, PresenceConnector, PresenceHandle, WsPresenceConnector};
pub use state::{ChannelPhase, SessionState};
pub use store::SessionStore;
pub use transport::{AuthTransport, HttpTransport};
pub use types::{AuthUser, LoginRequest, ProfileUpdate, SignupRequest};
