use crate::application::auth_service::AuthService;
use crate::application::permissions::{Action, Resource, authorize};
use crate::application::user_service::UserService;
use crate::domain::caller::Caller;
use crate::domain::error::DomainError;
use crate::presentation::dto::{RegisterRequest, UserResponse};
use crate::presentation::utils::{caller_name, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use tracing::info;
use uuid::Uuid;

#[post("/users")]
pub async fn register(
    req: HttpRequest,
    caller: Caller,
    auth: web::Data<AuthService>,
    users: web::Data<UserService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::User, Action::Create, &caller)?;
    let (profile, password) = payload.into_inner().into_new_user()?;

    let user = auth.register(profile, &password).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        username = %user.username,
        "user registered"
    );

    let profile = users.get_user(user.id).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(profile)))
}

#[get("/users")]
pub async fn list_users(
    caller: Caller,
    users: web::Data<UserService>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::User, Action::List, &caller)?;
    let body: Vec<UserResponse> = users
        .list_users()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

#[get("/users/{id}")]
pub async fn get_user(
    caller: Caller,
    users: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::User, Action::Retrieve, &caller)?;
    let profile = users.get_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    req: HttpRequest,
    caller: Caller,
    users: web::Data<UserService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::User, Action::Destroy, &caller)?;
    let user_id = path.into_inner();

    users.delete_user(user_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        user_id = %user_id,
        "user deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
