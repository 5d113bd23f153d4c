//! Authentication service.
//!
//! Provides password login and registration on top of [`LocalUserService`],
//! and keeps the logged-in session in two places:
//!
//! - the store, under `access_token` and `currentUser`, so a later process
//!   picks the session back up
//! - `watch` channels, so views can react to login state changes
//!
//! Login and registration never return an error: a failure is logged and
//! reported as `false`.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::db::{ACCESS_TOKEN_KEY, CURRENT_USER_KEY, KeyValueStore, StoreError};
use crate::models::{CreateUserRequest, Session, UpdateUserRequest, User};
use crate::services::users::{LocalUserService, UserError};

/// Session holder and login/registration front door.
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    users: Arc<LocalUserService>,
    session: watch::Sender<Option<Session>>,
    user_logged: watch::Sender<bool>,
    admin_logged: watch::Sender<bool>,
}

impl AuthService {
    /// Create the service, restoring any session persisted in `store`.
    ///
    /// A stored user that cannot be decoded clears both session keys.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, users: Arc<LocalUserService>) -> Self {
        let restored = restore_session(store.as_ref());
        let (user_logged, _) = watch::channel(restored.is_some());
        let is_admin = restored.as_ref().is_some_and(|s| s.user.is_admin());
        let (admin_logged, _) = watch::channel(is_admin);
        let (session, _) = watch::channel(restored);

        Self {
            store,
            users,
            session,
            user_logged,
            admin_logged,
        }
    }

    // =========================================================================
    // Login / Registration
    // =========================================================================

    /// Log in with email and password.
    ///
    /// Returns `true` and starts a session on success. Unknown email, wrong
    /// password and storage failures all return `false`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let (email, password) = (email.to_owned(), password.to_owned());
        match self
            .with_users(move |users| users.authenticate_user(&email, &password))
            .await
        {
            Ok(Some(user)) => self.begin_session(user),
            Ok(None) => {
                info!("Login rejected: invalid email or password");
                false
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                false
            }
        }
    }

    /// Register a new account and log it in.
    ///
    /// Returns `false` on validation failure, duplicate email or storage
    /// failure.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &CreateUserRequest) -> bool {
        let request = request.clone();
        match self.with_users(move |users| users.create_user(&request)).await {
            Ok(user) => {
                info!(user_id = %user.user_id, "User registered");
                self.begin_session(user)
            }
            Err(AuthError::User(e))
                if e.is_validation() || matches!(e, UserError::DuplicateEmail) =>
            {
                info!(reason = %e, "Registration rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                false
            }
        }
    }

    /// End the session.
    pub fn logout(&self) {
        let user_id = self.current_user().map(|u| u.user_id);
        self.clear_auth_data();
        if let Some(user_id) = user_id {
            info!(user_id = %user_id, "User logged out");
        }
    }

    /// Remove the persisted session keys and reset all login state.
    ///
    /// Storage failures are logged; the in-memory state is cleared regardless.
    pub fn clear_auth_data(&self) {
        clear_session_keys(self.store.as_ref());
        self.publish(None);
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the logged-in user's current record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    /// Returns `AuthError::User` if the account no longer exists.
    pub async fn get_profile(&self) -> Result<User, AuthError> {
        let user_id = self.current_user().ok_or(AuthError::NotAuthenticated)?.user_id;
        self.with_users(move |users| {
            users
                .find_user_by_id(user_id)?
                .ok_or(UserError::UserNotFound(user_id))
        })
        .await
    }

    /// Update the logged-in user's profile and refresh the stored session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if nobody is logged in.
    /// Returns `AuthError::User` if the update is rejected.
    /// Returns `AuthError::Store` if the refreshed session cannot be saved.
    #[instrument(skip(self, changes))]
    pub async fn update_profile(&self, changes: &UpdateUserRequest) -> Result<User, AuthError> {
        let session = self.session.borrow().clone().ok_or(AuthError::NotAuthenticated)?;
        let user_id = session.user.user_id;
        let changes = changes.clone();
        let updated = self
            .with_users(move |users| users.update_user(user_id, &changes))
            .await?;

        let refreshed = Session {
            access_token: session.access_token,
            user: updated.clone(),
        };
        self.persist(&refreshed)?;
        self.publish(Some(refreshed));

        info!(user_id = %user_id, "Profile updated");
        Ok(updated)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session.borrow().as_ref().map(|s| s.user.clone())
    }

    /// The current access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|s| s.access_token.clone())
    }

    /// Whether any user is logged in.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        *self.user_logged.borrow()
    }

    /// Whether the logged-in user is an admin.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        *self.admin_logged.borrow()
    }

    /// Watch the whole session (token and user).
    #[must_use]
    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Watch the "any user logged in" flag.
    #[must_use]
    pub fn subscribe_user_logged(&self) -> watch::Receiver<bool> {
        self.user_logged.subscribe()
    }

    /// Watch the "admin logged in" flag.
    #[must_use]
    pub fn subscribe_admin_logged(&self) -> watch::Receiver<bool> {
        self.admin_logged.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Run a user-service call on the blocking pool.
    async fn with_users<T, F>(&self, f: F) -> Result<T, AuthError>
    where
        F: FnOnce(&LocalUserService) -> Result<T, UserError> + Send + 'static,
        T: Send + 'static,
    {
        let users = Arc::clone(&self.users);
        Ok(tokio::task::spawn_blocking(move || f(users.as_ref())).await??)
    }

    fn begin_session(&self, user: User) -> bool {
        let user_id = user.user_id;
        let session = Session::start(user, Utc::now());
        if let Err(e) = self.persist(&session) {
            warn!(user_id = %user_id, error = %e, "Could not persist session");
            return false;
        }
        self.publish(Some(session));
        info!(user_id = %user_id, "Session started");
        true
    }

    fn persist(&self, session: &Session) -> Result<(), StoreError> {
        let user = serde_json::to_string(&session.user).map_err(|source| StoreError::Encode {
            key: CURRENT_USER_KEY.to_owned(),
            source,
        })?;
        self.store.set(ACCESS_TOKEN_KEY, &session.access_token)?;
        self.store.set(CURRENT_USER_KEY, &user)
    }

    fn publish(&self, session: Option<Session>) {
        let logged = session.is_some();
        let admin = session.as_ref().is_some_and(|s| s.user.is_admin());
        self.session.send_replace(session);
        self.user_logged.send_replace(logged);
        self.admin_logged.send_replace(admin);
    }
}

fn restore_session(store: &dyn KeyValueStore) -> Option<Session> {
    match (store.get(ACCESS_TOKEN_KEY), store.get(CURRENT_USER_KEY)) {
        (Ok(None), Ok(None)) => None,
        (Ok(Some(access_token)), Ok(Some(raw))) => match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                info!(user_id = %user.user_id, "Restored session");
                Some(Session { access_token, user })
            }
            Err(e) => {
                warn!(error = %e, "Stored session is unreadable, clearing it");
                clear_session_keys(store);
                None
            }
        },
        (Ok(_), Ok(_)) => {
            warn!("Stored session is incomplete, clearing it");
            clear_session_keys(store);
            None
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Could not read stored session");
            None
        }
    }
}

fn clear_session_keys(store: &dyn KeyValueStore) {
    for key in [ACCESS_TOKEN_KEY, CURRENT_USER_KEY] {
        if let Err(e) = store.remove(key) {
            warn!(key, error = %e, "Could not clear session key");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::session::TOKEN_PREFIX;
    use crate::services::crypto::CryptoService;

    /// Memory store whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn break_writes(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(StoreError::Backend("disk full".into()))
            } else {
                Ok(())
            }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.check()?;
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.check()?;
            self.inner.remove(key)
        }
    }

    fn auth_over(store: Arc<dyn KeyValueStore>) -> AuthService {
        let users = Arc::new(LocalUserService::new(Arc::clone(&store), CryptoService::default()));
        AuthService::new(store, users)
    }

    fn jane() -> CreateUserRequest {
        CreateUserRequest::new("Jane Doe", "Jane@Test.com", "secret1")
    }

    #[tokio::test]
    async fn test_register_starts_session() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let auth = auth_over(Arc::clone(&store));
        let mut logged = auth.subscribe_user_logged();

        assert!(auth.register(&jane()).await);
        assert!(logged.has_changed().unwrap());
        assert!(*logged.borrow_and_update());
        assert!(auth.is_logged_in());
        assert!(!auth.is_admin());

        let token = auth.access_token().unwrap();
        assert!(token.starts_with(TOKEN_PREFIX));
        assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), Some(token));

        let stored = store.get(CURRENT_USER_KEY).unwrap().unwrap();
        assert!(stored.contains("jane@test.com"));
        assert!(!stored.contains("password"));
    }

    #[tokio::test]
    async fn test_register_duplicate_returns_false() {
        let auth = auth_over(Arc::new(MemoryStore::new()));
        assert!(auth.register(&jane()).await);
        auth.logout();

        let again = CreateUserRequest::new("Jane Again", "JANE@test.com", "secret2");
        assert!(!auth.register(&again).await);
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let auth = auth_over(Arc::new(MemoryStore::new()));
        assert!(auth.register(&jane()).await);
        auth.logout();

        assert!(!auth.login("jane@test.com", "wrong-pass").await);
        assert!(!auth.login("nobody@test.com", "secret1").await);
        assert!(!auth.is_logged_in());

        assert!(auth.login("  JANE@test.com ", "secret1").await);
        assert_eq!(auth.current_user().unwrap().name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_admin_flag() {
        let auth = auth_over(Arc::new(MemoryStore::new()));
        let admin =
            CreateUserRequest::new("Ada Admin", "ada@shop.io", "secret1").with_role("admin");
        assert!(auth.register(&admin).await);
        assert!(auth.is_admin());

        auth.logout();
        assert!(!auth.is_admin());
        assert!(!auth.is_logged_in());
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_session_restored_by_new_instance() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = auth_over(Arc::clone(&store));
        assert!(first.register(&jane()).await);

        let second = auth_over(store);
        assert!(second.is_logged_in());
        assert_eq!(second.access_token(), first.access_token());
        assert_eq!(second.current_user(), first.current_user());
    }

    #[test]
    fn test_unreadable_session_is_cleared() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entries([
            (ACCESS_TOKEN_KEY, "local_token_1"),
            (CURRENT_USER_KEY, "{not json"),
        ]));
        let auth = auth_over(Arc::clone(&store));
        assert!(!auth.is_logged_in());
        assert!(store.get(ACCESS_TOKEN_KEY).unwrap().is_none());
        assert!(store.get(CURRENT_USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_fails_softly_when_session_cannot_be_saved() {
        let store = Arc::new(FlakyStore::default());
        let auth = auth_over(store.clone());
        assert!(auth.register(&jane()).await);
        auth.logout();

        store.break_writes();
        assert!(!auth.login("jane@test.com", "secret1").await);
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_tolerates_storage_failure() {
        let store = Arc::new(FlakyStore::default());
        let auth = auth_over(store.clone());
        assert!(auth.register(&jane()).await);

        store.break_writes();
        auth.logout();
        assert!(!auth.is_logged_in());
        assert!(auth.access_token().is_none());
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let auth = auth_over(Arc::new(MemoryStore::new()));
        assert!(matches!(auth.get_profile().await, Err(AuthError::NotAuthenticated)));
        assert!(matches!(
            auth.update_profile(&UpdateUserRequest::default()).await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_stored_user() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let auth = auth_over(Arc::clone(&store));
        assert!(auth.register(&jane()).await);
        let token = auth.access_token();

        let changes = UpdateUserRequest {
            name: Some("Jane Smith".into()),
            ..UpdateUserRequest::default()
        };
        let updated = auth.update_profile(&changes).await.unwrap();
        assert_eq!(updated.name, "Jane Smith");
        assert_eq!(auth.get_profile().await.unwrap().name, "Jane Smith");
        assert_eq!(auth.access_token(), token);
        assert!(store.get(CURRENT_USER_KEY).unwrap().unwrap().contains("Jane Smith"));
    }
}
