use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::caller::Identity;
use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, User};
use crate::infrastructure::config::AdminCredentials;
use crate::infrastructure::security::{
    JwtKeys, hash_password, verify_dummy_password, verify_password,
};

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, profile, password), fields(username = %profile.username))]
    pub async fn register(&self, profile: NewUser, password: &str) -> Result<User, DomainError> {
        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        self.repo.create(User::new(profile, hash)).await
    }

    /// Exchanges credentials for a signed token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, DomainError> {
        let Some(user) = self.repo.find_by_username(username).await? else {
            verify_dummy_password(password);
            return Err(bad_credentials());
        };

        let valid = verify_password(password, &user.password_hash).map_err(|_| bad_credentials())?;
        if !valid {
            return Err(bad_credentials());
        }

        self.keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }

    /// Resolves a presented token to the identity it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, DomainError> {
        let claims = self
            .keys
            .verify_token(token)
            .map_err(|_| DomainError::invalid_token())?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::invalid_token())?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(DomainError::invalid_token)?;

        Ok(Identity {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        })
    }

    /// Creates the configured administrator unless the username is taken.
    pub async fn ensure_admin(&self, credentials: &AdminCredentials) -> Result<(), DomainError> {
        match self.repo.find_by_username(&credentials.username).await? {
            Some(existing) if existing.is_admin => Ok(()),
            Some(existing) => {
                warn!(username = %existing.username, "bootstrap admin exists without admin rights");
                Ok(())
            }
            None => {
                let profile = NewUser {
                    username: credentials.username.clone(),
                    is_admin: true,
                    ..NewUser::default()
                };
                let admin = self.register(profile, &credentials.password).await?;
                info!(user_id = %admin.id, username = %admin.username, "bootstrap admin created");
                Ok(())
            }
        }
    }
}

fn bad_credentials() -> DomainError {
    DomainError::Unauthorized("unable to log in with provided credentials".into())
}
