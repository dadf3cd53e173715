use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::info;
use wiki_settings_sdk::{AuthError, FederatedProvider, IdentitySession, IdentityState, UserId};

const MIN_PASSWORD_LENGTH: usize = 6;

struct Account {
    user: UserId,
    password: String,
}

#[derive(Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    next_id: u64,
    reset_requests: Vec<String>,
}

impl Directory {
    fn allocate(&mut self, prefix: &str) -> UserId {
        self.next_id += 1;
        UserId::new(format!("{prefix}-{}", self.next_id))
    }
}

/// In-process identity provider with email/password accounts.
///
/// Starts unsettled, like a provider that has not answered yet; call
/// [`InMemoryIdentitySession::settle`] or [`InMemoryIdentitySession::restore`]
/// to publish the first state.
pub struct InMemoryIdentitySession {
    directory: Mutex<Directory>,
    federated: Mutex<HashMap<FederatedProvider, UserId>>,
    state: watch::Sender<IdentityState>,
}

impl Default for InMemoryIdentitySession {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryIdentitySession {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(IdentityState::pending());
        Self {
            directory: Mutex::new(Directory::default()),
            federated: Mutex::new(HashMap::new()),
            state,
        }
    }

    /// Report "nobody signed in" as the first settled state.
    pub fn settle(&self) {
        self.publish(IdentityState::signed_out());
    }

    /// Resume a previously signed-in session.
    pub fn restore(&self, user: UserId) {
        self.publish(IdentityState::signed_in(user));
    }

    /// Emails for which a password reset was requested, oldest first.
    #[must_use]
    pub fn reset_requests(&self) -> Vec<String> {
        self.directory.lock().reset_requests.clone()
    }

    fn publish(&self, state: IdentityState) {
        info!(user = ?state.identity.as_ref().map(UserId::as_str), settled = state.settled, "identity changed");
        self.state.send_replace(state);
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}

#[async_trait]
impl IdentitySession for InMemoryIdentitySession {
    fn state(&self) -> IdentityState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.state.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserId, AuthError> {
        let email = normalize_email(email)?;
        let user = {
            let directory = self.directory.lock();
            match directory.accounts.get(&email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.publish(IdentityState::signed_in(user.clone()));
        Ok(user)
    }

    async fn sign_in_federated(&self, provider: FederatedProvider) -> Result<UserId, AuthError> {
        let user = {
            let mut federated = self.federated.lock();
            federated
                .entry(provider)
                .or_insert_with(|| self.directory.lock().allocate(&provider.to_string()))
                .clone()
        };
        self.publish(IdentityState::signed_in(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }
        let user = {
            let mut directory = self.directory.lock();
            if directory.accounts.contains_key(&email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            let user = directory.allocate("user");
            directory.accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    password: password.to_owned(),
                },
            );
            user
        };
        self.publish(IdentityState::signed_in(user.clone()));
        Ok(user)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;
        let mut directory = self.directory.lock();
        if !directory.accounts.contains_key(&email) {
            return Err(AuthError::UserNotFound);
        }
        directory.reset_requests.push(email);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.publish(IdentityState::signed_out());
        Ok(())
    }
}
