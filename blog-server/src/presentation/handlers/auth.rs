use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{TokenRequest, TokenResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;
use validator::Validate;

/// Exchanges a username and password for an API token.
#[post("/token")]
pub async fn obtain_token(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, DomainError> {
    payload.validate()?;
    let TokenRequest { username, password } = payload.into_inner();
    let username = username.unwrap_or_default();

    let token = service
        .login(&username, &password.unwrap_or_default())
        .await?;

    info!(request_id = %request_id(&req), username = %username, "token issued");

    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        token_type: "Token".to_string(),
        expires_in: service.keys().ttl_seconds(),
    }))
}
