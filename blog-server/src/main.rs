use std::sync::Arc;

use blog_server::AppServices;
use blog_server::data::comment_repository::PostgresCommentRepository;
use blog_server::data::post_repository::PostgresPostRepository;
use blog_server::data::user_repository::PostgresUserRepository;
use blog_server::infrastructure::config::AppConfig;
use blog_server::infrastructure::database::{create_pool, run_migrations};
use blog_server::infrastructure::logging::init_logging;
use blog_server::infrastructure::security::JwtKeys;
use blog_server::server::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;

    let services = AppServices::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(PostgresPostRepository::new(pool.clone())),
        Arc::new(PostgresCommentRepository::new(pool)),
        JwtKeys::new(config.jwt_secret.clone(), config.token_ttl_hours),
    );

    if let Some(admin) = &config.bootstrap_admin {
        services.auth.ensure_admin(admin).await?;
    }

    start_rest_server(services, config).await
}
