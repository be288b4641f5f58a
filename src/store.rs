//! The session store: owns the session record and drives every auth action.
//!
//! DESIGN
//! ======
//! State lives inside a `tokio::sync::watch` channel; every mutation goes
//! through `send_modify`, so observers always see complete snapshots and
//! check-and-set guards (single-flight flags, the channel phase machine)
//! are atomic against concurrent actions. The presence handle is kept
//! outside the snapshot in its own mutex; only the task that wins the phase
//! transition touches it.
//!
//! ERROR HANDLING
//! ==============
//! The store is the terminal handler for all failures: each action converts
//! its error into a notification or a log line and returns nothing. No
//! retries, no timeouts.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::warn;

use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::notify::{LogNotifier, Notifier};
use crate::presence::{OnlineUsersFn, PresenceConnector, PresenceHandle, WsPresenceConnector};
use crate::state::{ChannelPhase, SessionState};
use crate::transport::{AuthTransport, HttpTransport};
use crate::types::{LoginRequest, ProfileUpdate, SignupRequest};

const SIGNUP_OK: &str = "Account created successfully";
const LOGIN_OK: &str = "Logged in successfully";
const LOGOUT_OK: &str = "Logged out successfully";
const PROFILE_OK: &str = "Profile updated successfully";

struct Inner {
    state: watch::Sender<SessionState>,
    handle: Mutex<Option<Arc<dyn PresenceHandle>>>,
}

/// Reactive session/presence state container.
///
/// Explicitly constructed and injectable: consumers receive a reference
/// instead of reaching into module scope, and every collaborator is a trait
/// object so tests can script them.
pub struct SessionStore {
    transport: Arc<dyn AuthTransport>,
    connector: Arc<dyn PresenceConnector>,
    notifier: Arc<dyn Notifier>,
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Build a store from explicit collaborators.
    #[must_use]
    pub fn new(
        transport: Arc<dyn AuthTransport>,
        connector: Arc<dyn PresenceConnector>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::new());
        Self {
            transport,
            connector,
            notifier,
            inner: Arc::new(Inner { state, handle: Mutex::new(None) }),
        }
    }

    /// Build a store wired to the real HTTP transport, the websocket
    /// presence connector, and the tracing notifier.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn with_defaults(config: SessionConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config.clone())?;
        let connector = WsPresenceConnector::new(config);
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(connector),
            Arc::new(LogNotifier),
        ))
    }

    /// Current snapshot of the session record.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to snapshot updates; each mutation publishes a new value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Validate the ambient session (`GET /auth/check`).
    ///
    /// Success stores the user and opens the presence channel; failure
    /// clears the user and logs. Either way `is_checking_auth` is cleared.
    pub async fn check_auth(&self) {
        match self.transport.check().await {
            Ok(user) => {
                self.inner.state.send_modify(|s| {
                    s.auth_user = Some(user);
                    s.is_checking_auth = false;
                });
                self.connect_socket().await;
            }
            Err(error) => {
                self.inner.state.send_modify(|s| {
                    s.auth_user = None;
                    s.is_checking_auth = false;
                });
                warn!(target: "chat_session::store", %error, "auth check failed");
            }
        }
    }

    /// Create an account (`POST /auth/signup`). Single-flight: a call while
    /// a signup is already in flight returns without issuing a request.
    pub async fn signup(&self, req: SignupRequest) {
        if !self.try_begin(|s| &mut s.is_signing_up) {
            return;
        }
        match self.transport.signup(&req).await {
            Ok(user) => {
                self.inner.state.send_modify(|s| s.auth_user = Some(user));
                self.notifier.success(SIGNUP_OK);
                self.connect_socket().await;
            }
            Err(error) => self.notifier.error(error.user_message()),
        }
        self.inner.state.send_modify(|s| s.is_signing_up = false);
    }

    /// Authenticate (`POST /auth/login`). Same contract as [`signup`]:
    /// single-flight on `is_logging_in`, presence channel opened on success.
    ///
    /// [`signup`]: SessionStore::signup
    pub async fn login(&self, req: LoginRequest) {
        if !self.try_begin(|s| &mut s.is_logging_in) {
            return;
        }
        match self.transport.login(&req).await {
            Ok(user) => {
                self.inner.state.send_modify(|s| s.auth_user = Some(user));
                self.notifier.success(LOGIN_OK);
                self.connect_socket().await;
            }
            Err(error) => self.notifier.error(error.user_message()),
        }
        self.inner.state.send_modify(|s| s.is_logging_in = false);
    }

    /// End the session (`POST /auth/logout`). No loading flag.
    pub async fn logout(&self) {
        match self.transport.logout().await {
            Ok(()) => {
                self.inner.state.send_modify(|s| s.auth_user = None);
                self.notifier.success(LOGOUT_OK);
                self.disconnect_socket();
            }
            Err(error) => self.notifier.error(error.user_message()),
        }
    }

    /// Mutate profile fields (`PUT /auth/update-profile`). Single-flight on
    /// `is_updating_profile`; success replaces the stored user wholesale.
    pub async fn update_profile(&self, update: ProfileUpdate) {
        if !self.try_begin(|s| &mut s.is_updating_profile) {
            return;
        }
        match self.transport.update_profile(&update).await {
            Ok(user) => {
                self.inner.state.send_modify(|s| s.auth_user = Some(user));
                self.notifier.success(PROFILE_OK);
            }
            Err(error) => {
                warn!(target: "chat_session::store", %error, "profile update failed");
                self.notifier.error(error.user_message());
            }
        }
        self.inner.state.send_modify(|s| s.is_updating_profile = false);
    }

    /// Open the presence channel for the authenticated user.
    ///
    /// No-op unless a user is present and the phase check-and-set
    /// `Disconnected -> Connecting` wins; a `Connected` phase whose handle
    /// still reports live also short-circuits, so repeated calls perform
    /// zero additional opens.
    pub async fn connect_socket(&self) {
        let Some(user_id) = self.claim_connecting() else {
            return;
        };

        let inner = Arc::clone(&self.inner);
        let on_online: OnlineUsersFn = Arc::new(move |ids| {
            inner.state.send_modify(|s| s.online_users = ids);
        });

        match self.connector.connect(&user_id, on_online).await {
            Ok(handle) => {
                *self.inner.handle.lock().unwrap_or_else(std::sync::PoisonError::into_inner) =
                    Some(handle);
                self.inner
                    .state
                    .send_modify(|s| s.channel = ChannelPhase::Connected);
            }
            Err(error) => {
                warn!(target: "chat_session::store", %error, "presence connect failed");
                self.inner
                    .state
                    .send_modify(|s| s.channel = ChannelPhase::Disconnected);
            }
        }
    }

    /// Close the presence channel if it is connected, clearing the stored
    /// handle and the online-user list.
    pub fn disconnect_socket(&self) {
        let mut claimed = false;
        self.inner.state.send_modify(|s| {
            if s.channel == ChannelPhase::Connected {
                s.channel = ChannelPhase::Disconnecting;
                claimed = true;
            }
        });
        if !claimed {
            return;
        }

        let handle = self
            .inner
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.is_connected() {
                handle.close();
            }
        }

        self.inner.state.send_modify(|s| {
            s.channel = ChannelPhase::Disconnected;
            s.online_users.clear();
        });
    }

    /// Atomically set a loading flag, returning false if it was already set.
    fn try_begin(&self, flag: impl Fn(&mut SessionState) -> &mut bool) -> bool {
        let mut claimed = false;
        self.inner.state.send_modify(|s| {
            let f = flag(s);
            if !*f {
                *f = true;
                claimed = true;
            }
        });
        claimed
    }

    /// Atomically move the phase machine to `Connecting`, returning the user
    /// id to connect as, or `None` if the transition is not allowed.
    fn claim_connecting(&self) -> Option<String> {
        let live = self
            .inner
            .handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| h.is_connected());

        let mut user_id = None;
        self.inner.state.send_modify(|s| {
            let Some(user) = &s.auth_user else { return };
            match s.channel {
                ChannelPhase::Connecting | ChannelPhase::Disconnecting => {}
                ChannelPhase::Connected if live => {}
                // Disconnected, or Connected with a dead handle.
                ChannelPhase::Connected | ChannelPhase::Disconnected => {
                    s.channel = ChannelPhase::Connecting;
                    user_id = Some(user.id.clone());
                }
            }
        });
        user_id
    }
}
