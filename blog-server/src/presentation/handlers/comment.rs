//! Comment endpoints. The same handlers serve the nested routes under
//! `/posts/{post_id}/comments` and the flat `/comments` routes; the presence of
//! `post_id` in the path decides the scope.

use crate::application::comment_service::CommentService;
use crate::application::permissions::{Action, Resource, authorize};
use crate::domain::caller::Caller;
use crate::domain::comment::CommentScope;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CommentPatchRequest, CommentPath, CommentRequest, CommentResponse, CommentsPath,
};
use crate::presentation::utils::{caller_name, request_id};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const COLLECTIONS: [&str; 2] = ["/posts/{post_id}/comments", "/comments"];

pub fn configure(cfg: &mut web::ServiceConfig) {
    for collection in COLLECTIONS {
        cfg.service(
            web::resource(collection)
                .route(web::get().to(list_comments))
                .route(web::post().to(create_comment)),
        )
        .service(
            web::resource(format!("{collection}/{{id}}"))
                .route(web::get().to(get_comment))
                .route(web::put().to(update_comment))
                .route(web::patch().to(partial_update_comment))
                .route(web::delete().to(delete_comment)),
        );
    }
}

fn scope_of(post_id: Option<Uuid>) -> CommentScope {
    post_id.map_or(CommentScope::All, CommentScope::Post)
}

async fn list_comments(
    req: HttpRequest,
    caller: Caller,
    comments: web::Data<CommentService>,
    path: web::Path<CommentsPath>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Comment, Action::List, &caller)?;
    let scope = scope_of(path.post_id);
    let comments = comments.list_comments(scope).await?;

    info!(
        request_id = %request_id(&req),
        count = comments.len(),
        "comments retrieved"
    );

    let body: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_comment(
    req: HttpRequest,
    caller: Caller,
    comments: web::Data<CommentService>,
    path: web::Path<CommentsPath>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Comment, Action::Create, &caller)?;
    let author = caller.identity()?;
    let (post, text) = payload.into_inner().into_fields()?;

    let comment = comments
        .create_comment(author, scope_of(path.post_id), post, text)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %author.username,
        comment_id = %comment.id,
        post_id = %comment.post_id,
        "comment created"
    );

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

async fn get_comment(
    caller: Caller,
    comments: web::Data<CommentService>,
    path: web::Path<CommentPath>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Comment, Action::Retrieve, &caller)?;
    let comment = comments.get_comment(scope_of(path.post_id), path.id).await?;
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

async fn update_comment(
    req: HttpRequest,
    caller: Caller,
    comments: web::Data<CommentService>,
    path: web::Path<CommentPath>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Comment, Action::Update, &caller)?;
    // `post` is ignored here: a comment never moves between posts.
    let (_, text) = payload.into_inner().into_fields()?;

    let comment = comments
        .update_comment(
            &caller,
            scope_of(path.post_id),
            path.id,
            Action::Update,
            Some(text),
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        comment_id = %comment.id,
        "comment replaced"
    );

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

async fn partial_update_comment(
    req: HttpRequest,
    caller: Caller,
    comments: web::Data<CommentService>,
    path: web::Path<CommentPath>,
    payload: web::Json<CommentPatchRequest>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Comment, Action::PartialUpdate, &caller)?;
    let payload = payload.into_inner();
    payload.validate()?;

    let comment = comments
        .update_comment(
            &caller,
            scope_of(path.post_id),
            path.id,
            Action::PartialUpdate,
            payload.comment_text,
        )
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        comment_id = %comment.id,
        "comment updated"
    );

    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

async fn delete_comment(
    req: HttpRequest,
    caller: Caller,
    comments: web::Data<CommentService>,
    path: web::Path<CommentPath>,
) -> Result<HttpResponse, DomainError> {
    authorize(Resource::Comment, Action::Destroy, &caller)?;
    comments
        .delete_comment(&caller, scope_of(path.post_id), path.id)
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %caller_name(&caller),
        comment_id = %path.id,
        "comment deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
