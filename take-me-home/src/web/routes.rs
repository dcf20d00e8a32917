//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDateTime;
use tracing::{debug, error, warn};

use crate::planner::{PlanningReport, RoutePlanner};
use crate::scoring::{ScoringError, ScoringWeights, build_explanation, score_plan};

use super::dto::*;
use super::state::{AppState, LiveData};

/// Router for the JSON API.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/routes", get(static_routes))
        .route("/v1/routes/live", get(live_routes))
        .route("/v1/plans/score", post(score_travel_plan))
        .with_state(state)
}

/// Liveness plus a summary of the configuration.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache_ttl_seconds: state.config.cache_ttl.as_secs(),
        live_data: matches!(state.live.as_ref(), LiveData::Ready(_)),
    })
}

/// Resolve `depart_at`, defaulting to the current local time.
fn start_time(state: &AppState, depart_at: Option<&str>) -> Result<NaiveDateTime, AppError> {
    match depart_at {
        None => Ok(state.now()),
        Some(raw) => parse_timestamp(raw).ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid depart_at: {raw} (expected YYYY-MM-DDTHH:MM)"),
        }),
    }
}

/// Planner reports arrive ranked by arrival.
fn in_order(report: PlanningReport, order: RouteOrder) -> PlanningReport {
    match order {
        RouteOrder::Arrival => report,
        RouteOrder::Score => report.ranked_by_score(),
    }
}

/// Evaluate the built-in candidate routes.
async fn static_routes(
    State(state): State<AppState>,
    Query(query): Query<RoutesQuery>,
) -> Result<Json<RoutesResponse>, AppError> {
    let start = start_time(&state, query.depart_at.as_deref())?;
    debug!(start = %start, "Evaluating candidate routes");

    let planner = RoutePlanner::new(start)
        .map_err(|e| AppError::Internal {
            message: e.to_string(),
        })?
        .with_weights(ScoringWeights::default());
    let report = in_order(planner.evaluate(), query.sort);

    Ok(Json(RoutesResponse::from_report(start, &report, vec![])))
}

/// Evaluate ferry routes built from live provider data.
async fn live_routes(
    State(state): State<AppState>,
    Query(query): Query<RoutesQuery>,
) -> Result<Json<RoutesResponse>, AppError> {
    let builder = match state.live.as_ref() {
        LiveData::Ready(builder) => builder,
        LiveData::Unavailable(reason) => {
            return Err(AppError::ServiceUnavailable {
                message: format!("Live route data unavailable: {reason}"),
            });
        }
    };
    let start = start_time(&state, query.depart_at.as_deref())?;
    debug!(start = %start, "Evaluating live routes");

    let live = builder.plan(start, ScoringWeights::default()).await;
    let report = in_order(live.report, query.sort);
    let unavailable = live
        .unavailable
        .iter()
        .map(|f| UnavailableRoute {
            route: f.route_name.clone(),
            reason: f.error.to_string(),
        })
        .collect();

    Ok(Json(RoutesResponse::from_report(start, &report, unavailable)))
}

/// Score a caller-supplied travel plan.
async fn score_travel_plan(
    Json(req): Json<ScorePlanRequest>,
) -> Result<Json<ScorePlanResponse>, AppError> {
    let weights = req.weights()?;
    let plan = req.to_plan()?;
    let breakdown = score_plan(&plan, &weights);
    let explanation = build_explanation(&plan, &breakdown);

    Ok(Json(ScorePlanResponse::new(&plan, &breakdown, explanation)))
}

/// Handler failure, rendered as a JSON error body.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl From<ScoringError> for AppError {
    fn from(e: ScoringError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<PlanRequestError> for AppError {
    fn from(e: PlanRequestError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::ServiceUnavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), message = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), message = %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new(AppConfig::default())
    }

    fn query(depart_at: &str) -> Query<RoutesQuery> {
        Query(RoutesQuery {
            depart_at: Some(depart_at.to_string()),
            ..RoutesQuery::default()
        })
    }

    #[tokio::test]
    async fn health_reports_config() {
        let Json(body) = health(State(state())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.cache_ttl_seconds, 300);
        assert!(!body.live_data);
    }

    #[tokio::test]
    async fn static_routes_ranked_by_arrival() {
        let Json(body) = static_routes(State(state()), query("2025-06-01T14:05"))
            .await
            .unwrap();

        let names: Vec<_> = body.routes.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(
            names,
            vec!["Tacoma Narrows", "Edmonds → Kingston", "Seattle → Bainbridge"]
        );
        assert_eq!(body.depart_at, "2025-06-01T14:05");
        assert_eq!(body.routes[0].score, None);
        assert_eq!(body.routes[1].arrival, "2025-06-01T16:48");
        assert_eq!(body.routes[1].terminal_wait_minutes, 48);
        assert!((body.routes[1].score.unwrap() - 122.71).abs() < 0.01);
        assert_eq!(body.routes[1].legs[1].risk, Some("comfortable"));
        assert!(body.unavailable.is_empty());
    }

    #[tokio::test]
    async fn static_routes_ranked_by_score() {
        let Query(mut q) = query("2025-06-01T14:05");
        q.sort = RouteOrder::Score;
        let Json(body) = static_routes(State(state()), Query(q)).await.unwrap();

        let names: Vec<_> = body.routes.iter().map(|r| r.route.as_str()).collect();
        assert_eq!(
            names,
            vec!["Seattle → Bainbridge", "Edmonds → Kingston", "Tacoma Narrows"]
        );
    }

    #[test]
    fn sort_query_parses() {
        let q: RoutesQuery = serde_json::from_value(json!({ "sort": "score" })).unwrap();
        assert_eq!(q.sort, RouteOrder::Score);
        let q: RoutesQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(q.sort, RouteOrder::Arrival);
    }

    #[tokio::test]
    async fn static_routes_report_missed_sailings() {
        let Json(body) = static_routes(State(state()), query("2025-06-01T17:00"))
            .await
            .unwrap();

        assert_eq!(body.routes.len(), 1);
        assert_eq!(body.routes[0].route, "Tacoma Narrows");
        let failed: Vec<_> = body.unavailable.iter().map(|u| u.route.as_str()).collect();
        assert_eq!(failed, vec!["Edmonds → Kingston", "Seattle → Bainbridge"]);
    }

    #[tokio::test]
    async fn static_routes_reject_bad_time() {
        let err = static_routes(State(state()), query("tomorrow"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn live_routes_unavailable_without_config() {
        let err = live_routes(State(state()), query("2025-06-01T14:05"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable { .. }));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    fn score_request(weights: serde_json::Value) -> Json<ScorePlanRequest> {
        Json(
            serde_json::from_value(json!({
                "ferry": {
                    "name": "WSF Edmonds–Kingston 15:40",
                    "departure": "2025-06-01T15:40",
                    "arrival": "2025-06-01T16:12",
                    "risk": 0.1,
                    "buffer_minutes": 48
                },
                "driving_minutes_pre": 47,
                "driving_minutes_post": 36,
                "weights": weights
            }))
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn scores_plan() {
        let Json(body) = score_travel_plan(score_request(json!({})))
            .await
            .unwrap();

        // travel 163 * 0.6 + driving 83 * 0.3 + risk 0.1 * 0.1
        assert!((body.total - 122.71).abs() < 1e-9);
        assert_eq!(body.components.len(), 3);
        assert_eq!(body.weights["total_travel_time"], 0.6);
        assert_eq!(body.estimated_arrival, "2025-06-01T16:48");
        assert!(body.explanation.contains("Composite score: 122.71"));
    }

    #[tokio::test]
    async fn score_rejects_oversized_minutes() {
        let Json(mut req) = score_request(json!({}));
        req.driving_minutes_post = 9_000_000_000_000_000_000;

        let err = score_travel_plan(Json(req)).await.unwrap_err();
        assert!(matches!(&err, AppError::BadRequest { message } if message.contains("one week")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn score_rejects_unknown_weight() {
        let err = score_travel_plan(score_request(json!({ "speed": 1.0 })))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
