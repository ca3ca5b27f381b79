use uuid::Uuid;

use crate::domain::error::DomainError;

/// Verified identity behind a request token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

/// The party issuing the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Caller {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Caller::Authenticated(identity) if identity.is_admin)
    }

    pub fn identity(&self) -> Result<&Identity, DomainError> {
        match self {
            Caller::Authenticated(identity) => Ok(identity),
            Caller::Anonymous => Err(DomainError::not_authenticated()),
        }
    }
}
