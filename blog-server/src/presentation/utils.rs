use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::caller::Caller;
use crate::domain::error::DomainError;
use crate::presentation::middleware::RequestId;

/// The caller resolved by `AuthenticationMiddleware`; anonymous when it did not run.
impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(req.extensions().get::<Caller>().cloned().unwrap_or_default()))
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

pub fn caller_name(caller: &Caller) -> &str {
    match caller {
        Caller::Authenticated(identity) => identity.username.as_str(),
        Caller::Anonymous => "anonymous",
    }
}

/// Unreadable bodies become the same structured 400 as field validation.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| DomainError::malformed_body(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| DomainError::malformed_body(err.to_string()).into())
}

/// A path segment that does not parse as an id names no resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, req| DomainError::NotFound(req.path().to_string()).into())
}
