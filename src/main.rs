use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use training_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        app_state
            .user_service
            .ensure_default_admin(email, password)
            .await?;
    }

    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                match state.course_service.close_expired().await {
                    Ok(0) => {}
                    Ok(closed) => {
                        info!(closed, "auto-closed courses past their end date");
                        state.course_cache.invalidate().await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "Course auto-close error");
                    }
                }
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        });
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let admin_api = Router::new()
        .route(
            "/api/courses",
            get(routes::courses::list_courses).post(routes::courses::create_course),
        )
        .route(
            "/api/courses/:id",
            get(routes::courses::get_course)
                .put(routes::courses::update_course)
                .delete(routes::courses::delete_course),
        )
        .route(
            "/api/courses/:id/status",
            patch(routes::courses::update_course_status),
        )
        .route("/api/candidates", get(routes::candidates::list_candidates))
        .route(
            "/api/candidates/export",
            get(routes::export::export_candidates),
        )
        .route(
            "/api/candidates/bulk-status",
            post(routes::candidates::bulk_update_status),
        )
        .route(
            "/api/candidates/:id",
            get(routes::candidates::get_candidate)
                .put(routes::candidates::update_candidate)
                .delete(routes::candidates::delete_candidate),
        )
        .route(
            "/api/candidates/:id/status",
            patch(routes::candidates::update_candidate_status),
        )
        .route("/api/students", get(routes::students::list_students))
        .route("/api/students/export", get(routes::export::export_students))
        .route(
            "/api/blog",
            get(routes::blog::list_posts).post(routes::blog::create_post),
        )
        .route(
            "/api/blog/:id",
            get(routes::blog::get_post)
                .put(routes::blog::update_post)
                .delete(routes::blog::delete_post),
        )
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications)
                .post(routes::notifications::create_notification),
        )
        .route(
            "/api/notifications/read-all",
            patch(routes::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            patch(routes::notifications::mark_read),
        )
        .route(
            "/api/notifications/:id",
            delete(routes::notifications::delete_notification),
        )
        .route(
            "/api/email-templates",
            get(routes::email_templates::list_templates)
                .post(routes::email_templates::create_template),
        )
        .route(
            "/api/email-templates/:id",
            get(routes::email_templates::get_template)
                .put(routes::email_templates::update_template)
                .delete(routes::email_templates::delete_template),
        )
        .route(
            "/api/communication/send",
            post(routes::communication::send_communication),
        )
        .route(
            "/api/communication/test",
            post(routes::communication::send_test),
        )
        .route(
            "/api/admin/users",
            get(routes::admin_users::list_users).post(routes::admin_users::create_user),
        )
        .route(
            "/api/admin/users/:id",
            put(routes::admin_users::update_user).delete(routes::admin_users::delete_user),
        )
        .route(
            "/api/admin/profile/:id",
            get(routes::admin_users::get_profile).put(routes::admin_users::update_profile),
        )
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/auth/forgot-password",
            post(routes::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(routes::auth::reset_password),
        )
        .route("/api/dashboard/stats", get(routes::dashboard::stats));

    // The public application form posts to the same path the admin list
    // reads from. Only the POST side is rate limited.
    let public_api = Router::new()
        .route(
            "/api/candidates",
            post(routes::candidates::create_candidate),
        )
        .layer(axum::middleware::from_fn_with_state(
            training_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            training_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(admin_api)
        .merge(public_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
