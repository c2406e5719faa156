use std::sync::Arc;

use libris_db::{SessionStorage, StoredSession};
use libris_events::{Notification, Notifier};
use libris_kernel::{require_text, CoreError, CoreResult};

use super::models::{self, User};
use crate::utils::IdSequence;

/// Tracks the known users and who is signed in.
///
/// Passwords are accepted but never checked: `login` matches on email alone.
/// Anything beyond a demo must add real credential verification here.
pub struct SessionStore {
    users: Vec<User>,
    current_user: Option<User>,
    user_ids: IdSequence,
    notifier: Arc<dyn Notifier>,
    storage: Box<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(notifier: Arc<dyn Notifier>, storage: Box<dyn SessionStorage>) -> Self {
        Self {
            users: Vec::new(),
            current_user: None,
            user_ids: IdSequence::new("u"),
            notifier,
            storage,
        }
    }

    pub fn seed_demo_users(&mut self) {
        for user in models::demo_users() {
            self.register(user);
        }
    }

    /// Adopt the persisted identity, if any.
    ///
    /// A known email resolves to the registered user, and the stored copy is
    /// rewritten when it disagrees. An unknown email is registered unless its
    /// id already belongs to someone else, in which case the app starts
    /// signed out.
    pub fn restore(&mut self) -> CoreResult<Option<User>> {
        let Some(stored) = self.storage.load()? else {
            return Ok(None);
        };

        let registered = self.users.iter().find(|u| u.email == stored.email).cloned();
        let user = match registered {
            Some(user) => {
                let current = StoredSession::from(&user);
                if current != stored {
                    tracing::info!(
                        user_id = %user.id,
                        stored_id = %stored.id,
                        "persisted session refreshed from user set"
                    );
                    if let Err(err) = self.storage.save(&current) {
                        tracing::warn!(error = %err, "failed to refresh persisted session");
                    }
                }
                user
            }
            None if self.users.iter().any(|u| u.id == stored.id) => {
                tracing::warn!(
                    user_id = %stored.id,
                    "persisted session id belongs to another user; starting signed out"
                );
                return Ok(None);
            }
            None => {
                let user = User::from(stored);
                self.register(user.clone());
                user
            }
        };

        self.user_ids.observe(&user.id);
        tracing::info!(user_id = %user.id, "session restored");
        self.current_user = Some(user.clone());
        Ok(Some(user))
    }

    /// Sign in by email; the password is not verified.
    pub fn login(&mut self, email: &str, _password: &str) -> CoreResult<User> {
        let found = self.users.iter().find(|u| u.email == email).cloned();
        let result = found
            .ok_or(CoreError::InvalidCredentials)
            .and_then(|user| self.persist(&user).map(|()| user));

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user logged in");
                self.notifier.notify(Notification::success(
                    "Login successful",
                    format!("Welcome back, {}!", user.name),
                ));
                self.current_user = Some(user.clone());
                Ok(user)
            }
            Err(err) => self.fail(err),
        }
    }

    pub fn signup(&mut self, name: &str, email: &str, _password: &str) -> CoreResult<User> {
        match self.try_signup(name, email) {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "user signed up");
                self.notifier.notify(Notification::success(
                    "Signup successful",
                    format!("Welcome, {}!", user.name),
                ));
                Ok(user)
            }
            Err(err) => self.fail(err),
        }
    }

    fn try_signup(&mut self, name: &str, email: &str) -> CoreResult<User> {
        require_text("name", name)?;
        require_text("email", email)?;

        if self.users.iter().any(|u| u.email == email) {
            return Err(CoreError::email_in_use(email));
        }

        let user = User {
            id: self.user_ids.issue(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.persist(&user)?;

        self.users.push(user.clone());
        self.current_user = Some(user.clone());
        Ok(user)
    }

    /// Sign out. Always succeeds; a storage failure is only logged.
    pub fn logout(&mut self) {
        if let Some(user) = self.current_user.take() {
            tracing::info!(user_id = %user.id, "user logged out");
        }

        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }

        self.notifier.notify(Notification::success(
            "Logged out",
            "You have been successfully logged out",
        ));
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// The signed-in user, for gating operations that need one.
    pub fn require_user(&self) -> CoreResult<&User> {
        self.current_user
            .as_ref()
            .ok_or(CoreError::Unauthenticated)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    fn register(&mut self, user: User) {
        self.user_ids.observe(&user.id);
        self.users.push(user);
    }

    fn persist(&mut self, user: &User) -> CoreResult<()> {
        self.storage.save(&StoredSession::from(user))?;
        Ok(())
    }

    fn fail<T>(&self, err: CoreError) -> CoreResult<T> {
        tracing::warn!(code = err.code(), error = %err, "session operation failed");
        self.notifier.notify(Notification::from_error(&err));
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_db::{MemorySessionStorage, StorageError};
    use libris_events::{NotificationLog, Severity};

    fn store_with(storage: Box<dyn SessionStorage>) -> (SessionStore, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::new());
        let mut store = SessionStore::new(log.clone(), storage);
        store.seed_demo_users();
        (store, log)
    }

    fn store() -> (SessionStore, Arc<NotificationLog>) {
        store_with(Box::new(MemorySessionStorage::new()))
    }

    fn stored(id: &str, name: &str, email: &str) -> StoredSession {
        StoredSession {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    struct BrokenStorage;

    impl SessionStorage for BrokenStorage {
        fn load(&self) -> Result<Option<StoredSession>, StorageError> {
            Ok(None)
        }

        fn save(&mut self, _session: &StoredSession) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "session.json".into(),
                source: std::io::Error::other("read-only"),
            })
        }

        fn clear(&mut self) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: "session.json".into(),
                source: std::io::Error::other("read-only"),
            })
        }
    }

    #[test]
    fn login_by_email_ignores_password() {
        let (mut store, log) = store();

        let user = store.login("jane@example.com", "anything").unwrap();
        assert_eq!(user.name, "Jane Smith");
        assert!(store.is_authenticated());
        assert_eq!(store.current_user(), Some(&user));
        assert_eq!(
            store.storage().load().unwrap(),
            Some(stored("u2", "Jane Smith", "jane@example.com"))
        );
        assert_eq!(log.last().unwrap().description, "Welcome back, Jane Smith!");
    }

    #[test]
    fn unknown_email_keeps_previous_session() {
        let (mut store, log) = store();
        store.login("john@example.com", "").unwrap();

        let err = store.login("nobody@x.com", "pw").unwrap_err();
        assert_eq!(err, CoreError::InvalidCredentials);
        assert_eq!(store.current_user().unwrap().email, "john@example.com");

        let note = log.last().unwrap();
        assert_eq!(note.title, "Login failed");
        assert_eq!(note.severity, Severity::Destructive);
    }

    #[test]
    fn signup_assigns_fresh_id_and_signs_in() {
        let (mut store, log) = store();

        let user = store.signup("Ada", "ada@x.com", "pw").unwrap();
        assert_eq!(user.id, "u3");
        assert_eq!(store.current_user(), Some(&user));
        assert_eq!(store.users().len(), 3);
        assert_eq!(log.last().unwrap().title, "Signup successful");

        store.logout();
        assert_eq!(store.login("ada@x.com", "").unwrap().id, "u3");
    }

    #[test]
    fn duplicate_signup_keeps_first_user() {
        let (mut store, log) = store();

        let first = store.signup("A", "dup@x.com", "p").unwrap();
        let err = store.signup("B", "dup@x.com", "p").unwrap_err();

        assert_eq!(err, CoreError::email_in_use("dup@x.com"));
        assert_eq!(store.current_user(), Some(&first));
        assert_eq!(store.users().len(), 3);
        assert_eq!(log.last().unwrap().description, "Email already in use");
    }

    #[test]
    fn email_match_is_case_sensitive() {
        let (mut store, _log) = store();
        assert!(store.signup("Jane Again", "Jane@example.com", "p").is_ok());
        assert!(store.login("JOHN@example.com", "").is_err());
    }

    #[test]
    fn signup_requires_name_and_email() {
        let (mut store, _log) = store();
        assert_eq!(store.signup(" ", "x@x.com", "p").unwrap_err().code(), "validation_error");
        assert_eq!(store.signup("X", "", "p").unwrap_err().code(), "validation_error");
        assert!(!store.is_authenticated());
    }

    #[test]
    fn logout_clears_session_and_storage() {
        let (mut store, log) = store();
        store.login("jane@example.com", "").unwrap();

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(store.storage().load().unwrap(), None);
        assert_eq!(log.last().unwrap().title, "Logged out");

        store.logout();
        assert_eq!(store.require_user().unwrap_err(), CoreError::Unauthenticated);
    }

    #[test]
    fn restore_adopts_persisted_identity() {
        let storage =
            MemorySessionStorage::with_session(stored("u2", "Jane Smith", "jane@example.com"));
        let (mut store, _log) = store_with(Box::new(storage));

        let restored = store.restore().unwrap().unwrap();
        assert_eq!(restored.id, "u2");
        assert_eq!(store.require_user().unwrap().name, "Jane Smith");
        assert_eq!(store.users().len(), 2);
    }

    #[test]
    fn restored_stranger_is_registered() {
        let storage = MemorySessionStorage::with_session(stored("u7", "Zed", "zed@x.com"));
        let (mut store, _log) = store_with(Box::new(storage));
        store.restore().unwrap();

        assert_eq!(store.users().len(), 3);
        assert_eq!(store.signup("New", "new@x.com", "p").unwrap().id, "u8");
    }

    #[test]
    fn restored_stranger_with_taken_id_starts_signed_out() {
        let storage = MemorySessionStorage::with_session(stored("u1", "Zed", "zed@x.com"));
        let (mut store, _log) = store_with(Box::new(storage));

        assert_eq!(store.restore().unwrap(), None);
        assert!(!store.is_authenticated());

        let ids: Vec<_> = store.users().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2"]);
    }

    #[test]
    fn restored_known_email_adopts_registered_user() {
        let storage =
            MemorySessionStorage::with_session(stored("u5", "Imposter", "jane@example.com"));
        let (mut store, _log) = store_with(Box::new(storage));

        let restored = store.restore().unwrap().unwrap();
        assert_eq!(restored.id, "u2");
        assert_eq!(restored.name, "Jane Smith");
        assert!(store.users().contains(&restored));
        assert_eq!(
            store.storage().load().unwrap(),
            Some(stored("u2", "Jane Smith", "jane@example.com"))
        );

        store.logout();
        let issued: Vec<_> = ["a@x.com", "b@x.com", "c@x.com"]
            .iter()
            .map(|email| store.signup("New", email, "p").unwrap().id)
            .collect();
        assert_eq!(issued, vec!["u3", "u4", "u5"]);

        let mut ids: Vec<_> = store.users().iter().map(|u| u.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), store.users().len());
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let (mut store, log) = store_with(Box::new(BrokenStorage));

        let err = store.login("jane@example.com", "").unwrap_err();
        assert_eq!(err.code(), "storage_error");
        assert!(!store.is_authenticated());

        assert!(store.signup("Ada", "ada@x.com", "").is_err());
        assert_eq!(store.users().len(), 2);
        assert_eq!(log.last().unwrap().title, "Session error");

        store.logout();
        assert_eq!(log.last().unwrap().title, "Logged out");
    }
}
