//! The token-to-session embedder: a [`Table`] wrapped behind a single
//! process-wide lock, mapping opaque tokens to login sessions.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::RngCore;

use crate::Table;

/// A logged-in session, keyed by an opaque token in the [`SessionStore`]'s
/// table.
///
/// `credential` stands in for a password-or-credential-handle; this facade
/// stores it as-is and never hashes or validates it (authentication quality
/// is out of scope).
#[derive(Debug, Clone)]
pub struct Session {
    /// The account's email address.
    pub email: String,
    /// Opaque credential handed to `/login`.
    pub credential: String,
    /// When the session was created, for TTL expiry.
    pub created_at: Instant,
}

impl Session {
    /// Construct a new session, stamped with the current time.
    pub fn new(email: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            credential: credential.into(),
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

/// Generate an opaque token, unique enough for session identification: a
/// wall-clock timestamp concatenated with random bits. Not a
/// cryptographically-reviewed token scheme — good enough to key a session
/// table, not to resist a determined forger.
pub fn generate_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let random: u64 = rand::thread_rng().next_u64();
    format!("{nanos}_{random}")
}

/// Shared, lockable token→session store built on [`Table`].
///
/// The table itself has no internal synchronisation, so every access here
/// goes through a single `Mutex`, held for the full duration of each table
/// operation.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Table<String, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Construct an empty store with `initial_buckets` (`M0`) and the given
    /// session TTL.
    pub fn new(initial_buckets: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Table::with_initial_buckets(initial_buckets))),
            ttl,
        }
    }

    /// Insert a new session, returning its generated token.
    pub fn login(&self, email: impl Into<String>, credential: impl Into<String>) -> String {
        let token = generate_token();
        let session = Session::new(email, credential);
        let mut table = self.inner.lock().unwrap();
        // insert() only fails on allocator exhaustion; the facade has no
        // sensible recovery for that, so it propagates as a panic here same
        // as an OOM would anywhere else in the process.
        table.insert(token.clone(), session).expect("session table insert");
        token
    }

    /// Look up `token`. If present but expired, remove it and report it as
    /// absent.
    pub fn authenticate(&self, token: &str) -> Option<Session> {
        let now = Instant::now();
        let mut table = self.inner.lock().unwrap();
        let key = token.to_string();
        let session = table.try_get(&key)?.clone();
        if session.is_expired(self.ttl, now) {
            let _ = table.remove(&key);
            return None;
        }
        Some(session)
    }

    /// Remove `token`, returning whether it was present.
    pub fn logout(&self, token: &str) -> bool {
        let mut table = self.inner.lock().unwrap();
        table.remove(&token.to_string()).unwrap_or(false)
    }

    /// Delete every session.
    pub fn clear_all(&self) {
        self.inner.lock().unwrap().clear();
    }

    /// Evict every session older than the configured TTL. Returns the
    /// number of sessions evicted.
    ///
    /// This is what the periodic sweeper calls; it acquires the same lock as
    /// every HTTP handler for the whole call.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut table = self.inner.lock().unwrap();
        table
            .for_each_remove_if(|_token, session| session.is_expired(ttl, now))
            .unwrap_or(0)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().size()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A human-readable snapshot of the underlying table, for `debug`-level
    /// logging. Tokens are logged in full — this facade is not hardened for
    /// production secrecy.
    pub fn debug_dump(&self, label: &str) -> String {
        self.inner.lock().unwrap().debug_dump(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_login_then_authenticate() {
        let store = SessionStore::new(4, Duration::from_secs(300));
        let token = store.login("user@test.com", "pw");

        let session = store.authenticate(&token).expect("session should exist");
        assert_eq!(session.email, "user@test.com");
    }

    #[test]
    fn test_authenticate_missing_token() {
        let store = SessionStore::new(4, Duration::from_secs(300));
        assert!(store.authenticate("does-not-exist").is_none());
    }

    #[test]
    fn test_authenticate_expired_token_is_removed() {
        let store = SessionStore::new(4, Duration::from_millis(1));
        let token = store.login("user@test.com", "pw");
        sleep(Duration::from_millis(5));

        assert!(store.authenticate(&token).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_logout_removes_session() {
        let store = SessionStore::new(4, Duration::from_secs(300));
        let token = store.login("user@test.com", "pw");

        assert!(store.logout(&token));
        assert!(!store.logout(&token));
    }

    #[test]
    fn test_clear_all() {
        let store = SessionStore::new(4, Duration::from_secs(300));
        for n in 0..20 {
            store.login(format!("user{n}@test.com"), "pw");
        }
        assert_eq!(store.len(), 20);

        store.clear_all();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_sweep_expired_evicts_only_stale_sessions() {
        let store = SessionStore::new(4, Duration::from_millis(1));
        for n in 0..20 {
            store.login(format!("user{n}@test.com"), "pw");
        }
        sleep(Duration::from_millis(5));

        let evicted = store.sweep_expired();
        assert_eq!(evicted, 20);
        assert_eq!(store.len(), 0);
    }
}
