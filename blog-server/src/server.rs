use crate::application::AppServices;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::{
    AuthenticationMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use crate::presentation::utils::{json_config, path_config, query_config};
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};
use actix_web::{App, Error, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

pub async fn start_rest_server(services: AppServices, config: AppConfig) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || build_app(services.clone(), config.clone()))
        .bind(bind_address)?
        .run()
        .await
        .map_err(anyhow::Error::new)?;

    Ok(())
}

/// The complete application: middleware stack, shared services and routes.
pub fn build_app(
    services: AppServices,
    config: AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .app_data(web::Data::new(services.auth))
        .app_data(web::Data::new(services.users))
        .app_data(web::Data::new(services.posts))
        .app_data(web::Data::new(services.comments))
        .wrap(AuthenticationMiddleware)
        .wrap(build_cors(&config))
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer"))
                .add(("Permissions-Policy", "geolocation=()"))
                .add(("Cross-Origin-Opener-Policy", "same-origin")),
        )
        .wrap(TimingMiddleware)
        .wrap(RequestIdMiddleware)
        .wrap(Logger::default())
        .wrap(NormalizePath::trim())
        .service(web::scope("/api").configure(configure_routes))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(handlers::auth::obtain_token)
        .service(handlers::post::get_posts)
        .service(handlers::post::create_post)
        .service(handlers::post::get_post)
        .service(handlers::post::update_post)
        .service(handlers::post::partial_update_post)
        .service(handlers::post::delete_post)
        .service(handlers::user::register)
        .service(handlers::user::list_users)
        .service(handlers::user::get_user)
        .service(handlers::user::delete_user)
        .configure(handlers::comment::configure);
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
