use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use confab_api::auth::{self, AppState, AppStateInner};
use confab_api::middleware::{jwt_secret, require_auth};
use confab_api::{connections, conversations, events, notifications, publications, users};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confab=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret = jwt_secret();
    let db_path = std::env::var("CONFAB_DB_PATH").unwrap_or_else(|_| "confab.db".into());
    let host = std::env::var("CONFAB_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CONFAB_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = confab_db::Database::open(&PathBuf::from(&db_path))?;

    let app_state: AppState = Arc::new(AppStateInner { db, jwt_secret });

    let public_routes = Router::new()
        .route("/hello", get(confab_api::hello_world))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        // users
        .route("/users/me", get(users::me).put(users::update_profile).delete(users::delete_account))
        .route("/users/{user_id}", get(users::get_user))
        // connection requests
        .route("/connections", post(connections::create_request))
        .route("/connections/sent", get(connections::list_sent))
        .route("/connections/received", get(connections::list_received))
        .route("/connections/{request_id}", put(connections::respond).delete(connections::delete_request))
        // conversations & messages
        .route("/conversations", post(conversations::create_conversation).get(conversations::list_conversations))
        .route("/conversations/{conversation_id}", delete(conversations::delete_conversation))
        .route("/conversations/{conversation_id}/members", get(conversations::list_members).post(conversations::add_member))
        .route("/conversations/{conversation_id}/messages", get(conversations::get_messages).post(conversations::send_message))
        .route("/conversations/{conversation_id}/messages/{message_id}", put(conversations::edit_message))
        .route("/conversations/{conversation_id}/messages/{message_id}/read", post(conversations::mark_read))
        // publications
        .route("/publications", post(publications::create_publication).get(publications::feed))
        .route("/publications/{publication_id}", get(publications::get_publication).delete(publications::delete_publication))
        .route("/publications/{publication_id}/photos", post(publications::add_photo))
        .route("/publications/{publication_id}/comments", get(publications::list_comments).post(publications::create_comment))
        .route("/publications/{publication_id}/comments/{comment_id}", delete(publications::delete_comment))
        .route("/publications/{publication_id}/comments/{comment_id}/replies", get(publications::list_replies).post(publications::create_reply))
        .route("/publications/{publication_id}/likes", post(publications::like_publication))
        .route("/publications/{publication_id}/comments/{comment_id}/likes", post(publications::like_comment))
        // notifications & preferences
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/{notification_id}", delete(notifications::delete_notification))
        .route("/preferences/me", get(notifications::get_preference).put(notifications::update_preference))
        // events, stands, panels, panelists, favorites
        .route("/events", post(events::create_event).get(events::list_events))
        .route("/events/{event_id}", get(events::get_event).delete(events::delete_event))
        .route("/events/{event_id}/panels", post(events::create_panel))
        .route("/stands", post(events::create_stand).get(events::list_stands))
        .route("/stands/{stand_id}", delete(events::delete_stand))
        .route("/panels/{panel_id}", get(events::get_panel).delete(events::delete_panel))
        .route("/panels/{panel_id}/panelists", post(events::attach_panelist))
        .route("/panels/{panel_id}/favorite", post(events::add_favorite).delete(events::remove_favorite))
        .route("/panelists", post(events::create_panelist))
        .route("/favorites", get(events::list_favorites))
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Confab server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
