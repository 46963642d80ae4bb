//! Identity cache — single source of truth for the current user.
//!
//! ARCHITECTURE
//! ============
//! One `IdentityCache` instance is constructed at startup and handed (by
//! clone) to every consumer: route guards call [`IdentityCache::is_authenticated`]
//! and [`IdentityCache::has_any_authority`], components that need the full
//! account await [`IdentityCache::identity`], and anything reacting to
//! login/logout subscribes via [`IdentityCache::authentication_state`].
//!
//! TRADE-OFFS
//! ==========
//! The account fetch is memoized as a shared future: callers arriving while
//! a fetch is in flight attach to it instead of issuing their own request,
//! so the backend sees at most one `GET /api/account` per invalidation
//! window. Fetch failures of any kind are absorbed into an anonymous (None)
//! identity rather than surfaced — the UI reacts to "not signed in", never
//! to a transport error from this cache.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, Mutex, MutexGuard};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::broadcast;

use crate::net::account::AccountApi;
use crate::net::types::Identity;
use crate::state::storage::{Navigator, StateStorage};

/// Buffered authentication-state emissions per subscriber. Login/logout
/// events are rare; a slow subscriber that falls further behind than this
/// skips ahead to the oldest retained value.
const STATE_CHANNEL_CAPACITY: usize = 32;

/// A lazy, shareable account fetch. Awaiting it multiple times (or from
/// multiple clones) observes the same single resolution.
pub type IdentityFuture = Shared<BoxFuture<'static, Option<Identity>>>;

// =============================================================================
// IDENTITY STATE
// =============================================================================

/// The cache's view of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    /// No fetch or explicit authentication has happened yet.
    #[default]
    Unknown,
    /// A fetch resolved to "no identity", or `authenticate(None)` was called.
    Anonymous,
    /// A signed-in account.
    Authenticated(Identity),
}

// =============================================================================
// CACHE
// =============================================================================

struct CacheState {
    current: IdentityState,
    /// Most recently broadcast value, replayed to late subscribers.
    last_broadcast: Option<Option<Identity>>,
    /// Memoized in-flight or most-recently-resolved account fetch.
    account_fetch: Option<IdentityFuture>,
}

struct CacheShared {
    api: Arc<dyn AccountApi>,
    storage: Arc<StateStorage>,
    router: Option<Arc<dyn Navigator>>,
    state_tx: broadcast::Sender<Option<Identity>>,
    state: Mutex<CacheState>,
}

/// Shared identity cache. Cheap to clone; all clones observe one state.
#[derive(Clone)]
pub struct IdentityCache {
    shared: Arc<CacheShared>,
}

impl IdentityCache {
    /// Create a cache over the given account API. `router` is optional:
    /// without one, stored-URL restoration after login is skipped.
    #[must_use]
    pub fn new(api: Arc<dyn AccountApi>, storage: Arc<StateStorage>, router: Option<Arc<dyn Navigator>>) -> Self {
        let (state_tx, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(CacheShared {
                api,
                storage,
                router,
                state_tx,
                state: Mutex::new(CacheState {
                    current: IdentityState::Unknown,
                    last_broadcast: None,
                    account_fetch: None,
                }),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Set the current identity (`None` = logged out / anonymous) and emit
    /// it to every authentication-state subscriber. Infallible; emission
    /// order equals call order.
    pub fn authenticate(&self, identity: Option<Identity>) {
        let mut state = self.lock_state();
        state.current = match &identity {
            Some(account) => IdentityState::Authenticated(account.clone()),
            None => IdentityState::Anonymous,
        };
        state.last_broadcast = Some(identity.clone());
        tracing::debug!(signed_in = identity.is_some(), "authentication state changed");
        // Send while holding the lock so a concurrent subscribe() cannot
        // observe the replay slot and the live channel out of sync.
        let _ = self.shared.state_tx.send(identity);
    }

    /// True unless the current identity is exactly anonymous.
    ///
    /// The never-fetched [`IdentityState::Unknown`] state counts as
    /// authenticated: the check is strictly "not anonymous", not a presence
    /// check, and route guards depend on that exact behavior. See
    /// DESIGN.md for why this quirk is kept as-is.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !matches!(self.lock_state().current, IdentityState::Anonymous)
    }

    /// True iff a signed-in account holds at least one of the required
    /// authorities (any-of, not all-of). False when nothing is cached,
    /// the user is anonymous, or the account has no authorities.
    pub fn has_any_authority<I, S>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let state = self.lock_state();
        let IdentityState::Authenticated(account) = &state.current else {
            return false;
        };
        if account.authorities.is_empty() {
            return false;
        }
        required
            .into_iter()
            .any(|needed| account.has_authority(needed.as_ref()))
    }

    /// Single-authority convenience for [`IdentityCache::has_any_authority`].
    #[must_use]
    pub fn has_authority(&self, authority: &str) -> bool {
        self.has_any_authority([authority])
    }

    /// A snapshot of the current identity state.
    #[must_use]
    pub fn identity_state(&self) -> IdentityState {
        self.lock_state().current.clone()
    }

    /// Resolve the current account, fetching it from the backend at most
    /// once per invalidation window.
    ///
    /// Returns the memoized fetch when one exists, `force` is false, and
    /// the cache is not anonymous. Otherwise a new fetch is memoized and
    /// returned; every caller holding the same future observes one shared
    /// resolution. On completion the fetch calls
    /// [`IdentityCache::authenticate`] with its result (any fetch error
    /// resolves as `None`), and on a signed-in result restores the stored
    /// URL through the [`Navigator`].
    ///
    /// An in-flight fetch is never cancelled: `identity(true)` starts an
    /// independent fetch and the last one to complete wins.
    #[must_use]
    pub fn identity(&self, force: bool) -> IdentityFuture {
        let mut state = self.lock_state();
        let authenticated = !matches!(state.current, IdentityState::Anonymous);
        if !force && authenticated {
            if let Some(fetch) = &state.account_fetch {
                return fetch.clone();
            }
        }
        // Memoize before handing the future out, so callers racing past
        // the check above attach to this fetch instead of starting another.
        let fetch = self.new_account_fetch();
        state.account_fetch = Some(fetch.clone());
        fetch
    }

    /// Persist account settings via `POST /api/account`. Does not touch
    /// the cached identity.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::net::account::AccountError`] if the request fails.
    pub async fn save(&self, account: &Identity) -> Result<(), crate::net::account::AccountError> {
        self.shared.api.save_account(account).await
    }

    /// Subscribe to authentication-state changes. The subscription replays
    /// the most recently broadcast value (if any) and then yields every
    /// subsequent emission in order.
    #[must_use]
    pub fn authentication_state(&self) -> AuthenticationState {
        // Snapshot + subscribe under the state lock: authenticate() also
        // sends under this lock, so the replayed value and the live stream
        // never duplicate or drop an emission.
        let state = self.lock_state();
        AuthenticationState {
            replay: state.last_broadcast.clone(),
            rx: self.shared.state_tx.subscribe(),
        }
    }

    fn new_account_fetch(&self) -> IdentityFuture {
        let api = Arc::clone(&self.shared.api);
        // Weak: the memo slot stores this future, a strong cache handle
        // inside it would leak the cache through its own state.
        let cache = Arc::downgrade(&self.shared);
        async move {
            let resolved = match api.fetch_account().await {
                Ok(account) => Some(account),
                Err(err) => {
                    tracing::warn!(error = %err, "account fetch failed, treating session as anonymous");
                    None
                }
            };
            if let Some(shared) = cache.upgrade() {
                let cache = IdentityCache { shared };
                cache.authenticate(resolved.clone());
                if resolved.is_some() {
                    cache.navigate_to_stored_url();
                }
            }
            resolved
        }
        .boxed()
        .shared()
    }

    /// If a login redirect stored a target URL, restore it and clear the
    /// slot.
    fn navigate_to_stored_url(&self) {
        let Some(router) = &self.shared.router else { return };
        if let Some(url) = self.shared.storage.take_url() {
            tracing::debug!(%url, "restoring stored URL after login");
            router.navigate_by_url(&url);
        }
    }
}

// =============================================================================
// AUTHENTICATION STATE SUBSCRIPTION
// =============================================================================

/// Replay-one subscription to authentication-state changes, obtained from
/// [`IdentityCache::authentication_state`].
pub struct AuthenticationState {
    #[allow(clippy::option_option)]
    replay: Option<Option<Identity>>,
    rx: broadcast::Receiver<Option<Identity>>,
}

impl AuthenticationState {
    /// Receive the next authentication-state value: the latest value
    /// broadcast before subscribing (once), then each subsequent
    /// emission in order. Returns `None` once the cache is dropped. A
    /// subscriber lagging more than the channel buffer skips ahead to the
    /// oldest retained emission.
    #[allow(clippy::option_option)]
    pub async fn recv(&mut self) -> Option<Option<Identity>> {
        if let Some(replayed) = self.replay.take() {
            return Some(replayed);
        }
        loop {
            match self.rx.recv().await {
                Ok(value) => return Some(value),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "authentication-state subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
