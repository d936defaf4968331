//! API Handlers - Endpoint Logic and Error Mapping
//!
//! Each handler parses input into validated domain types, invokes a
//! usecase, and serializes the result. `ApiError` centralizes the
//! taxonomy-to-status mapping:
//! - `InvalidInput`, `InsufficientPoints` → 400
//! - `ChainRejected`, `ChainIndeterminate` → 500 (distinct error codes)
//! - `Internal` → 500 with a generic message, full error only in logs

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, instrument};

use crate::adapters::metrics::ApiMetrics;
use crate::domain::error::RewardError;
use crate::domain::player::{PlayerAddress, PointCategory};
use crate::domain::points::PendingClaim;
use crate::ports::token_query::TokenQuery;
use crate::usecases::{ClaimCoordinator, ScoringService};

use super::types::{
    format_base_units, AddPointsRequest, AddPointsResponse, BalanceResponse, ClaimRequest,
    ClaimResponse, ErrorResponse, GetPointsResponse, HealthResponse, PendingClaimDto,
    PendingClaimResponse, PointsDto, ResolveClaimRequest, ResolveClaimResponse,
    TokenInfoResponse,
};

/// Shared handler state; cheap to clone (all Arcs).
#[derive(Clone)]
pub struct AppState {
    pub scoring: Arc<ScoringService>,
    pub claims: Arc<ClaimCoordinator>,
    pub tokens: Arc<dyn TokenQuery>,
    pub metrics: Arc<ApiMetrics>,
    /// Deployed BTM contract address (for /token-info).
    pub contract_address: String,
    /// Token decimals (for balance formatting).
    pub decimals: u8,
}

/// Response-side wrapper around the reward error taxonomy.
pub struct ApiError(RewardError);

impl From<RewardError> for ApiError {
    fn from(err: RewardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            RewardError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RewardError::InsufficientPoints(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            RewardError::ChainRejected(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            RewardError::ChainIndeterminate(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            RewardError::Internal(inner) => {
                // Full chain to the logs, generic text to the client.
                error!(error = ?inner, "Unhandled internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            error_code: self.0.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn parse_address(raw: &str) -> Result<PlayerAddress, ApiError> {
    PlayerAddress::parse(raw).map_err(ApiError)
}

/// POST /add-points
#[instrument(skip(state, req))]
pub async fn add_points(
    State(state): State<AppState>,
    Json(req): Json<AddPointsRequest>,
) -> Result<Json<AddPointsResponse>, ApiError> {
    let player = parse_address(&req.player_address)?;
    let category = req.category.unwrap_or(PointCategory::Pvp);

    let amount = u64::try_from(req.points_to_add).map_err(|_| {
        ApiError(RewardError::InvalidInput(
            "pointsToAdd must be a positive integer".to_string(),
        ))
    })?;

    let balance = state.scoring.add_points(&player, category, amount).await?;

    let label = category.to_string();
    state
        .metrics
        .points_added
        .with_label_values(&[label.as_str()])
        .inc_by(amount);

    Ok(Json(AddPointsResponse {
        success: true,
        new_total_points: balance.get(category),
    }))
}

/// GET /get-points/:address
#[instrument(skip(state))]
pub async fn get_points(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<GetPointsResponse>, ApiError> {
    let player = parse_address(&address)?;
    let balance = state.scoring.get_points(&player).await?;

    Ok(Json(GetPointsResponse {
        success: true,
        points: PointsDto {
            pvp_points: balance.pvp,
            pve_points: balance.pve,
        },
    }))
}

/// POST /claim-rewards
#[instrument(skip(state, req))]
pub async fn claim_rewards(
    State(state): State<AppState>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let player = parse_address(&req.player_address)?;

    let timer = state.metrics.transfer_latency.start_timer();
    let result = state.claims.claim(&player, req.request_id).await;
    timer.observe_duration();

    match result {
        Ok(outcome) => {
            state.metrics.claims.with_label_values(&["settled"]).inc();
            let label = outcome.category.to_string();
            state
                .metrics
                .units_claimed
                .with_label_values(&[label.as_str()])
                .inc_by(outcome.claimed_units);

            Ok(Json(ClaimResponse {
                success: true,
                claimed_amount_btm: outcome.claimed_units,
                transaction_hash: outcome.tx_hash,
            }))
        }
        Err(err) => {
            let outcome_label = err.code().to_ascii_lowercase();
            state
                .metrics
                .claims
                .with_label_values(&[outcome_label.as_str()])
                .inc();
            Err(ApiError(err))
        }
    }
}

/// GET /balance/:address
#[instrument(skip(state))]
pub async fn balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let player = parse_address(&address)?;

    let raw = state
        .tokens
        .balance_of(&player)
        .await
        .map_err(RewardError::Internal)?;

    Ok(Json(BalanceResponse {
        address: player.to_string(),
        balance: raw.to_string(),
        formatted_balance: format_base_units(raw, state.decimals),
    }))
}

/// GET /token-info
#[instrument(skip(state))]
pub async fn token_info(
    State(state): State<AppState>,
) -> Result<Json<TokenInfoResponse>, ApiError> {
    let info = state
        .tokens
        .token_info()
        .await
        .map_err(RewardError::Internal)?;

    Ok(Json(TokenInfoResponse {
        name: info.name,
        symbol: info.symbol,
        token_type: "ERC-20".to_string(),
        contract_address: state.contract_address.clone(),
        decimals: info.decimals,
        total_supply: format_base_units(info.total_supply, info.decimals),
    }))
}

fn pending_dto(pending: PendingClaim) -> PendingClaimDto {
    PendingClaimDto {
        request_id: pending.request_id,
        category: pending.category.to_string(),
        units: pending.units,
        reason: pending.reason,
        at: pending.at.to_rfc3339(),
    }
}

/// GET /admin/pending-claim/:address
///
/// Operator view of an unresolved (Indeterminate) claim.
#[instrument(skip(state))]
pub async fn pending_claim(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<PendingClaimResponse>, ApiError> {
    let player = parse_address(&address)?;
    let pending = state.claims.pending_claim(&player).await?;

    Ok(Json(PendingClaimResponse {
        success: true,
        pending: pending.map(pending_dto),
    }))
}

/// POST /admin/resolve-claim
///
/// Operator hook: after checking the chain out-of-band, mark a parked
/// claim as transferred (commits the ledger reset) or not transferred
/// (releases the points).
#[instrument(skip(state, req))]
pub async fn resolve_claim(
    State(state): State<AppState>,
    Json(req): Json<ResolveClaimRequest>,
) -> Result<Json<ResolveClaimResponse>, ApiError> {
    let player = parse_address(&req.player_address)?;
    let resolved = state
        .claims
        .resolve_uncertain(&player, req.transferred)
        .await?;

    Ok(Json(ResolveClaimResponse {
        success: true,
        resolved: resolved.map(pending_dto),
    }))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state.metrics.render().map_err(RewardError::Internal).map_err(ApiError)
}
