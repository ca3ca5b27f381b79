//! Access rules for every resource operation.
//!
//! [`authorize`] runs before the store is touched. Rules that depend on the
//! record itself (comment ownership) are checked afterwards with
//! [`authorize_object`].

use uuid::Uuid;

use crate::domain::caller::Caller;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Post,
    Comment,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl Action {
    /// Read-only actions.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::List | Action::Retrieve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AllowAny,
    AdminOnly,
    AuthorOrReadOnly,
}

pub fn policy_for(resource: Resource, action: Action) -> Policy {
    match (resource, action) {
        (_, action) if action.is_safe() => Policy::AllowAny,
        (Resource::Post, _) => Policy::AdminOnly,
        (Resource::Comment, _) => Policy::AuthorOrReadOnly,
        (Resource::User, Action::Create) => Policy::AllowAny,
        (Resource::User, _) => Policy::AdminOnly,
    }
}

pub fn authorize(resource: Resource, action: Action, caller: &Caller) -> Result<(), DomainError> {
    match policy_for(resource, action) {
        Policy::AllowAny => Ok(()),
        Policy::AdminOnly => {
            caller.identity()?;
            if caller.is_admin() {
                Ok(())
            } else {
                Err(DomainError::Forbidden(
                    "administrator privileges required".into(),
                ))
            }
        }
        Policy::AuthorOrReadOnly => caller.identity().map(|_| ()),
    }
}

/// `owner` is the record's author, `None` when the author account is gone.
pub fn authorize_object(
    resource: Resource,
    action: Action,
    caller: &Caller,
    owner: Option<Uuid>,
) -> Result<(), DomainError> {
    match policy_for(resource, action) {
        Policy::AuthorOrReadOnly if action != Action::Create => {
            let identity = caller.identity()?;
            if owner == Some(identity.id) {
                Ok(())
            } else {
                Err(DomainError::Forbidden(
                    "only the author may modify this comment".into(),
                ))
            }
        }
        _ => Ok(()),
    }
}
