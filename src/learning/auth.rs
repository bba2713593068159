//! Identity & Session Module
//!
//! The identity provider is an external collaborator; `MockIdentityProvider`
//! stands in for it. `SessionManager` keeps the signed-in user in the
//! state store under the `token` and `user` keys.

use super::error::AuthError;
use super::notify::Notifier;
use super::store::StateStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub started_at: DateTime<Utc>,
}

/// Profile edit submitted by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub preferred_language: Option<String>,
}

/// Result of a profile edit. The preferred language is pushed into the
/// learning engine by the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChange {
    pub user: User,
    pub preferred_language: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Session, AuthError>;
    async fn update_profile(&self, current: &User, update: &ProfileUpdate) -> Result<User, AuthError>;
}

// ============================================================
// MOCK PROVIDER
// ============================================================

const MOCK_USER_ID: &str = "123";
const MOCK_TOKEN: &str = "mock-jwt-token";
const MIN_PASSWORD_LEN: usize = 6;

/// Local stand-in for the hosted identity service
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    latency: Duration,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn session_for(user: User) -> Session {
        Session {
            user,
            token: MOCK_TOKEN.to_string(),
            started_at: Utc::now(),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.delay().await;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidCredentials);
        }
        let first_name = email.split('@').next().unwrap_or_default();
        Ok(Self::session_for(User {
            id: MOCK_USER_ID.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: "User".to_string(),
        }))
    }

    async fn register(
        &self,
        email: &str,
        _password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Session, AuthError> {
        self.delay().await;
        Ok(Self::session_for(User {
            id: MOCK_USER_ID.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }))
    }

    async fn update_profile(&self, current: &User, update: &ProfileUpdate) -> Result<User, AuthError> {
        if update.first_name.trim().is_empty() || update.last_name.trim().is_empty() {
            return Err(AuthError::MissingName);
        }
        self.delay().await;
        Ok(User {
            id: current.id.clone(),
            email: update.email.clone().unwrap_or_else(|| current.email.clone()),
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
        })
    }
}

// ============================================================
// SESSION MANAGER
// ============================================================

pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn Notifier>,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            store,
            notifier,
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Reload a previously stored session. Both keys must be present.
    pub fn restore(&mut self) -> Result<bool, AuthError> {
        let token = self.store.load(TOKEN_KEY)?;
        let user = self.store.load(USER_KEY)?;
        match (token, user) {
            (Some(token), Some(user)) => {
                self.session = Some(Session {
                    user: serde_json::from_str(&user)?,
                    token,
                    started_at: Utc::now(),
                });
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let result = self.provider.login(email, password).await;
        self.finish_sign_in(result, "Login")
    }

    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, AuthError> {
        let result = self
            .provider
            .register(email, password, first_name, last_name)
            .await;
        self.finish_sign_in(result, "Registration")
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        if let Some(session) = self.session.take() {
            info!("Signed out {}", session.user.email);
        }
        Ok(())
    }

    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<ProfileChange, AuthError> {
        let current = self
            .current_user()
            .cloned()
            .ok_or(AuthError::NotAuthenticated)?;

        let user = match self.provider.update_profile(&current, &update).await {
            Ok(user) => user,
            Err(e) => {
                self.notifier.notify_failure(&e.to_string());
                return Err(e);
            }
        };

        self.store.save(USER_KEY, &serde_json::to_string(&user)?)?;
        if let Some(session) = self.session.as_mut() {
            session.user = user.clone();
        }
        self.notifier.notify_success("Profile updated successfully");

        Ok(ProfileChange {
            user,
            preferred_language: update.preferred_language,
        })
    }

    fn finish_sign_in(
        &mut self,
        result: Result<Session, AuthError>,
        action: &str,
    ) -> Result<User, AuthError> {
        let session = match result {
            Ok(session) => session,
            Err(e) => {
                self.notifier
                    .notify_failure(&format!("{} failed: {}", action, e));
                return Err(e);
            }
        };

        self.store.save(TOKEN_KEY, &session.token)?;
        self.store.save(USER_KEY, &serde_json::to_string(&session.user)?)?;
        info!("{} succeeded for {}", action, session.user.email);
        self.notifier.notify_success(&format!("{} successful", action));

        let user = session.user.clone();
        self.session = Some(session);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::notify::{Notification, RecordingNotifier};
    use crate::learning::store::InMemoryStateStore;

    fn manager() -> (SessionManager, Arc<InMemoryStateStore>, Arc<RecordingNotifier>) {
        let store = Arc::new(InMemoryStateStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let manager = SessionManager::new(
            Arc::new(MockIdentityProvider::new()),
            store.clone(),
            notifier.clone(),
        );
        (manager, store, notifier)
    }

    #[tokio::test]
    async fn test_login_derives_name_from_email() {
        let (mut sessions, store, _) = manager();
        let user = sessions.login("ada@example.com", "secret1").await.unwrap();

        assert_eq!(user.first_name, "ada");
        assert_eq!(user.last_name, "User");
        assert!(sessions.is_authenticated());
        assert_eq!(store.load("token").unwrap().as_deref(), Some("mock-jwt-token"));
    }

    #[tokio::test]
    async fn test_provider_latency_delays_sign_in() {
        let provider = MockIdentityProvider::with_latency(Duration::from_millis(20));
        let started = std::time::Instant::now();
        let session = provider.login("ada@example.com", "secret1").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(session.token, "mock-jwt-token");
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let (mut sessions, store, notifier) = manager();
        let err = sessions.login("ada@example.com", "123").await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!sessions.is_authenticated());
        assert!(store.load("token").unwrap().is_none());
        assert_eq!(
            notifier.last(),
            Some(Notification::Failure("Login failed: Invalid credentials".to_string()))
        );
    }

    #[tokio::test]
    async fn test_logout_and_restore() {
        let (mut sessions, store, notifier) = manager();
        sessions
            .register("grace@example.com", "hopper42", "Grace", "Hopper")
            .await
            .unwrap();

        let mut reloaded = SessionManager::new(
            Arc::new(MockIdentityProvider::new()),
            store.clone(),
            notifier.clone(),
        );
        assert!(reloaded.restore().unwrap());
        assert_eq!(reloaded.current_user().unwrap().last_name, "Hopper");

        reloaded.logout().unwrap();
        assert!(!reloaded.is_authenticated());
        assert!(store.load("user").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_requires_names() {
        let (mut sessions, _, _) = manager();
        let update = ProfileUpdate {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            email: None,
            preferred_language: Some("French".to_string()),
        };
        assert!(matches!(
            sessions.update_profile(update.clone()).await,
            Err(AuthError::NotAuthenticated)
        ));

        sessions.login("ada@example.com", "secret1").await.unwrap();
        assert!(matches!(
            sessions.update_profile(update.clone()).await,
            Err(AuthError::MissingName)
        ));

        let change = sessions
            .update_profile(ProfileUpdate {
                last_name: "Lovelace".to_string(),
                ..update
            })
            .await
            .unwrap();
        assert_eq!(change.user.last_name, "Lovelace");
        assert_eq!(change.preferred_language.as_deref(), Some("French"));
        assert_eq!(sessions.current_user().unwrap().first_name, "Ada");
    }
}
