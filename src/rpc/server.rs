use axum::extract::Extension;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::rpc::handlers::{
    AddCandidateRequest, AddCandidateResponse, CandidatesResponse, EndVotingResponse,
    HealthResponse, LifecycleResponse, StatusResponse, VoteRequest, VoteResponse, VotingApi,
    VotingChain, WinnerResponse,
};
use crate::utils::errors::GatewayError;

/// ApiServer ties the axum router to the chain-backed handlers.
pub struct ApiServer {
    addr: SocketAddr,
    api: Arc<VotingApi>,
}

impl ApiServer {
    pub fn new(addr: SocketAddr, chain: Arc<dyn VotingChain>) -> Self {
        Self {
            addr,
            api: Arc::new(VotingApi::new(chain)),
        }
    }

    /// Bind and serve until the shutdown channel flips.
    pub async fn start(self, mut shutdown_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
        let app = router(self.api);
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("API server listening on {}", self.addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
                info!("API server shutting down");
            })
            .await?;
        Ok(())
    }
}

/// Build the router. Separate from `ApiServer` so tests can drive it
/// directly with a mock chain.
pub fn router(api: Arc<VotingApi>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/candidates", get(list_candidates).post(add_candidate))
        .route("/api/vote", post(cast_vote))
        .route("/api/winner", get(winner))
        .route("/api/end-voting", post(end_voting))
        .route("/api/start-voting", post(start_voting))
        .route("/api/reset-voting", post(reset_voting))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(Extension(api)),
        )
}

async fn health(Extension(api): Extension<Arc<VotingApi>>) -> Json<HealthResponse> {
    Json(api.health())
}

async fn status(
    Extension(api): Extension<Arc<VotingApi>>,
) -> Result<Json<StatusResponse>, GatewayError> {
    Ok(Json(api.status().await?))
}

async fn add_candidate(
    Extension(api): Extension<Arc<VotingApi>>,
    Json(req): Json<AddCandidateRequest>,
) -> Result<Json<AddCandidateResponse>, GatewayError> {
    Ok(Json(api.add_candidate(req).await?))
}

async fn list_candidates(
    Extension(api): Extension<Arc<VotingApi>>,
) -> Result<Json<CandidatesResponse>, GatewayError> {
    Ok(Json(api.list_candidates().await?))
}

async fn cast_vote(
    Extension(api): Extension<Arc<VotingApi>>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, GatewayError> {
    Ok(Json(api.cast_vote(req).await?))
}

async fn winner(
    Extension(api): Extension<Arc<VotingApi>>,
) -> Result<Json<WinnerResponse>, GatewayError> {
    Ok(Json(api.winner().await?))
}

async fn end_voting(
    Extension(api): Extension<Arc<VotingApi>>,
) -> Result<Json<EndVotingResponse>, GatewayError> {
    Ok(Json(api.end_voting().await?))
}

async fn start_voting(
    Extension(api): Extension<Arc<VotingApi>>,
) -> Result<Json<LifecycleResponse>, GatewayError> {
    Ok(Json(api.start_voting().await?))
}

async fn reset_voting(
    Extension(api): Extension<Arc<VotingApi>>,
) -> Result<Json<LifecycleResponse>, GatewayError> {
    Ok(Json(api.reset_voting().await?))
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound
}
