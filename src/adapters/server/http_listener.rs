use crate::core::discovery_service::DiscoveryService;
use crate::core::error::{DiscoveryError, error_report};
use crate::core::types::ClientSelector;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DiscoveryQuery {
    pub role_arn: Option<String>,
}

pub(crate) fn build_router(discovery_service: Arc<DiscoveryService>) -> Router {
    Router::new()
        .route("/", get(discover))
        .layer(TraceLayer::new_for_http())
        .with_state(discovery_service)
}

async fn discover(
    State(discovery_service): State<Arc<DiscoveryService>>,
    Query(query): Query<DiscoveryQuery>,
) -> Response {
    let selector = ClientSelector::from_role_arn(query.role_arn.as_deref());
    match discovery_service.discover(&selector).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => discovery_error_response(&selector, e),
    }
}

fn discovery_error_response(selector: &ClientSelector, e: DiscoveryError) -> Response {
    let message = error_report(&e);
    match &e {
        DiscoveryError::Authorization(auth) => {
            error!(role_arn = auth.role_arn(), "Role assumption failed: {}", message)
        }
        DiscoveryError::Inventory(inv) => {
            error!(?selector, operation = %inv.operation(), "RDS inventory failed: {}", message)
        }
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

pub(crate) async fn run_http_listener(
    listen_addr: SocketAddr,
    discovery_service: Arc<DiscoveryService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    info!("RDS service discovery listening on http://{}", listen_addr);

    axum::serve(listener, build_router(discovery_service))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP listener on {} stopped.", listen_addr);
    Ok(())
}
