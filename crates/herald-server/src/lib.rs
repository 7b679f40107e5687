//! Local HTTP preview server for herald.
//!
//! Renders change events posted as JSON into channel messages using the
//! catalog at the configured path, so templates can be checked without a
//! live delivery channel.

use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use herald_core::{
    CatalogUrlResolver, ChangeEvent, Channel, CoreError, MarkupLinkExpander, MessageBuilder,
    OutgoingMessage,
};
use herald_fs::{Catalog, FsError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Server state shared across handlers.
struct AppState {
    catalog_path: PathBuf,
}

/// Start the preview server.
///
/// # Errors
/// Returns error if binding fails or server encounters an error.
pub async fn serve(catalog_path: &std::path::Path, host: &str, port: u16) -> Result<()> {
    let app = router(catalog_path.to_path_buf());

    let addr = format!("{host}:{port}");
    info!(address = %addr, catalog = %catalog_path.display(), "Starting preview server");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(catalog_path: PathBuf) -> Router {
    let state = Arc::new(AppState { catalog_path });

    Router::new()
        .route("/health", get(health))
        .route("/render/{channel}", post(render))
        .route("/test/{channel}", get(test_message))
        .route("/diff/{channel}", post(diff))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
struct PublisherQuery {
    #[serde(default)]
    publisher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiffRequest {
    #[serde(default)]
    old: Option<String>,
    new: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DiffResponse {
    diff: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Handlers ---

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn render(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Query(query): Query<PublisherQuery>,
    Json(event): Json<ChangeEvent>,
) -> Result<Json<OutgoingMessage>, AppError> {
    let channel: Channel = channel.parse()?;
    let catalog = Catalog::open(&state.catalog_path)?;
    let publisher = query
        .publisher
        .unwrap_or_else(|| catalog.config().publisher.name.clone());

    let profile = catalog.profile(Some(channel));
    let urls = CatalogUrlResolver::new(&catalog);
    let builder = MessageBuilder::new(profile.as_ref(), &catalog, &urls, &MarkupLinkExpander);

    let message = builder.build_outgoing_message(&publisher, &event)?;
    Ok(Json(message))
}

async fn test_message(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Query(query): Query<PublisherQuery>,
) -> Result<Json<OutgoingMessage>, AppError> {
    let channel: Channel = channel.parse()?;
    let catalog = Catalog::open(&state.catalog_path)?;
    let publisher = query
        .publisher
        .unwrap_or_else(|| catalog.config().publisher.name.clone());

    let profile = catalog.profile(Some(channel));
    let urls = CatalogUrlResolver::new(&catalog);
    let builder = MessageBuilder::new(profile.as_ref(), &catalog, &urls, &MarkupLinkExpander);

    Ok(Json(builder.build_test_message(&publisher)))
}

async fn diff(
    State(state): State<Arc<AppState>>,
    Path(channel): Path<String>,
    Json(req): Json<DiffRequest>,
) -> Result<Json<DiffResponse>, AppError> {
    let channel: Channel = channel.parse()?;
    let catalog = Catalog::open(&state.catalog_path)?;
    let profile = catalog.profile(Some(channel));

    Ok(Json(DiffResponse {
        diff: profile.render_diff(req.old.as_deref(), &req.new),
    }))
}

// --- Error handling ---

struct AppError(anyhow::Error);

impl AppError {
    fn core(&self) -> Option<&CoreError> {
        self.0.downcast_ref::<CoreError>().or_else(|| {
            match self.0.downcast_ref::<FsError>() {
                Some(FsError::Core(core)) => Some(core),
                _ => None,
            }
        })
    }

    fn status(&self) -> StatusCode {
        match self.core() {
            Some(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Some(CoreError::UnsupportedSubject(_) | CoreError::UnknownChannel(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(
                CoreError::MessageConstructionFailed { .. } | CoreError::InvalidEntityLink(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self.0, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use herald_core::{Entity, EventType};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn setup() -> (TempDir, Catalog) {
        let tmp = TempDir::new().unwrap();
        let catalog = Catalog::init(tmp.path()).unwrap();
        (tmp, catalog)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: &impl Serialize) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (tmp, _catalog) = setup();
        let request = Request::get("/health").body(Body::empty()).unwrap();

        let (status, body) = send(router(tmp.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_render_entity_event() {
        let (tmp, catalog) = setup();
        let entity = Entity::new("table", "orders").with_fqn("shop.public.orders");
        catalog.put_entity(&entity).unwrap();

        let event = ChangeEvent::for_entity(EventType::EntityCreated, entity, "alice");
        let request = post_json("/render/slack?publisher=Ops", &event);

        let (status, body) = send(router(tmp.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["userName"], "alice");
        assert!(body["header"].as_str().unwrap().starts_with("[Ops]"));
        assert!(!body["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_render_unknown_channel_is_bad_request() {
        let (tmp, _catalog) = setup();
        let event = ChangeEvent::for_thread(EventType::ThreadCreated, Uuid::new_v4(), "alice");
        let request = post_json("/render/pager", &event);

        let (status, body) = send(router(tmp.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("pager"));
    }

    #[tokio::test]
    async fn test_render_unsupported_subject_is_bad_request() {
        let (tmp, _catalog) = setup();
        let entity = Entity::new("spreadsheet", "budget").with_fqn("finance.budget");
        let event = ChangeEvent::for_entity(EventType::EntityCreated, entity, "alice");

        let (status, _) = send(
            router(tmp.path().to_path_buf()),
            post_json("/render/email", &event),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_render_missing_thread_is_not_found() {
        let (tmp, _catalog) = setup();
        let event = ChangeEvent::for_thread(EventType::ThreadCreated, Uuid::new_v4(), "alice");

        let (status, _) = send(
            router(tmp.path().to_path_buf()),
            post_json("/render/msteams", &event),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_connection_test_message() {
        let (tmp, _catalog) = setup();
        let request = Request::get("/test/gchat").body(Body::empty()).unwrap();

        let (status, body) = send(router(tmp.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["header"], "[Herald] Connection Test");

        let request = Request::get("/test/gchat?publisher=Ops")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(tmp.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["header"], "[Ops] Connection Test");
    }

    #[tokio::test]
    async fn test_diff_endpoint() {
        let (tmp, _catalog) = setup();
        let request = post_json(
            "/diff/slack",
            &serde_json::json!({ "old": "the quick fox", "new": "the slow fox" }),
        );

        let (status, body) = send(router(tmp.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["diff"], "the ~quick~ *slow* fox");
    }

    #[test]
    fn test_error_status_mapping() {
        let construction = AppError::from(CoreError::MessageConstructionFailed {
            thread_type: "Task".into(),
            event_type: "threadCreated".into(),
        });
        assert_eq!(construction.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let link = AppError::from(CoreError::InvalidEntityLink("<#E::table>".into()));
        assert_eq!(link.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let wrapped = AppError::from(FsError::Core(CoreError::ThreadNotFound("t".into())));
        assert_eq!(wrapped.status(), StatusCode::NOT_FOUND);

        let other = AppError::from(FsError::CatalogNotFound(PathBuf::from("/nowhere")));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
