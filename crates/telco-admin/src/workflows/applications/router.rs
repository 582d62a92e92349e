use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::PlanType;
use super::listing::ApplicationListService;
use super::repository::{ApplicationRepository, PageRequest};
use crate::workflows::orders::queue::{OrderDispatcher, OrderJobQueue};

/// Handler state shared by the application endpoints.
pub struct ApplicationRouterState<R, Q> {
    pub listing: ApplicationListService<R>,
    pub dispatcher: OrderDispatcher<R, Q>,
}

/// Router builder exposing the application listing and the NBN order
/// dispatch trigger.
pub fn application_router<R, Q>(state: Arc<ApplicationRouterState<R, Q>>) -> Router
where
    R: ApplicationRepository + 'static,
    Q: OrderJobQueue + 'static,
{
    Router::new()
        .route("/api/applications", get(list_handler::<R, Q>))
        .route(
            "/api/applications/nbn/process",
            post(process_handler::<R, Q>),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsQuery {
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

pub(crate) async fn list_handler<R, Q>(
    State(state): State<Arc<ApplicationRouterState<R, Q>>>,
    Query(query): Query<ListApplicationsQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
    Q: OrderJobQueue + 'static,
{
    // The literal "null" is valid input meaning no filter.
    let filter = match query.plan_type.as_deref() {
        None | Some("" | "null") => None,
        Some(raw) => match raw.parse::<PlanType>() {
            Ok(plan_type) => Some(plan_type),
            Err(err) => {
                let payload = json!({
                    "message": "Validation failed",
                    "errors": { "plan_type": [err.to_string()] },
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
            }
        },
    };

    let page = PageRequest {
        number: query.page.unwrap_or(1).max(1),
    };

    match state.listing.list(filter, page) {
        Ok(page) => (StatusCode::OK, Json(json!({ "data": page }))).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn process_handler<R, Q>(
    State(state): State<Arc<ApplicationRouterState<R, Q>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
    Q: OrderJobQueue + 'static,
{
    match state.dispatcher.dispatch() {
        Ok(count) => {
            tracing::info!(count, "queued nbn order jobs");
            let payload = json!({ "message": "NBN applications processed successfully" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
