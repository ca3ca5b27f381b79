use crate::application::permissions::{Action, Resource, authorize};
use crate::application::post_service::PostService;
use crate::domain::caller::Caller;
use crate::domain::error::DomainError;
use crate::domain::post::PostChanges;
use crate::presentation::dto::{ListPostsQuery, PostPatchRequest, PostRequest};
use crate::presentation::utils::{caller_name, request_id};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use tracing::info;
use uuid::Uuid;

#[post("/posts")]
pub async fn create_post(
    req: HttpRequest,
    caller: Caller,
    post: web::Data<PostService>,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Post, Action::Create, &caller)?;
    let author = caller.identity()?;
    let (title, content, claimed_author) = payload.into_inner().into_fields()?;
    post.check_author_reference(claimed_author).await?;

    let post = post.create_post(author, title, content).await?;

    info!(
        request_id = %request_id(&req),
        username = %author.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

#[put("/posts/{id}")]
pub async fn update_post(
    req: HttpRequest,
    caller: Caller,
    post: web::Data<PostService>,
    payload: web::Json<PostRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Post, Action::Update, &caller)?;
    let post_id = path.into_inner();
    let (title, content, claimed_author) = payload.into_inner().into_fields()?;
    post.check_author_reference(claimed_author).await?;

    let changes = PostChanges {
        title: Some(title),
        content: Some(content),
    };
    let post = post.update_post(post_id, changes).await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        post_id = %post_id,
        "post replaced"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[patch("/posts/{id}")]
pub async fn partial_update_post(
    req: HttpRequest,
    caller: Caller,
    post: web::Data<PostService>,
    payload: web::Json<PostPatchRequest>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Post, Action::PartialUpdate, &caller)?;
    let post_id = path.into_inner();
    let changes = payload.into_inner().into_changes()?;

    let post = post.update_post(post_id, changes).await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        post_id = %post_id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    caller: Caller,
    post: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Post, Action::Destroy, &caller)?;
    let post_id = path.into_inner();

    post.delete_post(post_id).await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[get("/posts")]
pub async fn get_posts(
    req: HttpRequest,
    caller: Caller,
    post: web::Data<PostService>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Post, Action::List, &caller)?;
    let ListPostsQuery { limit, offset } = query.into_inner();
    let posts = post.get_posts(limit, offset).await?;

    info!(
        request_id = %request_id(&req),
        count = posts.len(),
        "posts retrieved"
    );

    Ok(HttpResponse::Ok().json(posts))
}

#[get("/posts/{id}")]
pub async fn get_post(
    caller: Caller,
    post: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Post, Action::Retrieve, &caller)?;
    let post = post.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}
