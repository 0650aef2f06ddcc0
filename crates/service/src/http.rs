//! Warp routes for the prediction API

use std::convert::Infallible;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use farecast_core::FarecastError;

use crate::advisor::{self, AdvisorContext};
use crate::service::PredictionService;
use crate::types::{ErrorResponse, PredictionRequest};

#[derive(Debug, Deserialize)]
struct AdviseRequest {
    message: String,
    #[serde(default)]
    context: AdvisorContext,
}

/// All API routes over a shared service.
pub fn routes(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::get())
        .map(|| {
            warp::reply::json(&serde_json::json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            }))
        });

    let predict = warp::path!("api" / "predict")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(handle_predict);

    let history = warp::path!("api" / "history" / String)
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(handle_history);

    let delete_history = warp::path!("api" / "history" / String)
        .and(warp::delete())
        .and(with_service(service))
        .and_then(handle_delete_history);

    let advise = warp::path!("api" / "advise")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(handle_advise);

    health
        .or(predict)
        .or(history)
        .or(delete_history)
        .or(advise)
}

fn with_service(
    service: Arc<PredictionService>,
) -> impl Filter<Extract = (Arc<PredictionService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

async fn handle_predict(
    request: PredictionRequest,
    service: Arc<PredictionService>,
) -> Result<impl Reply, Infallible> {
    match service.predict(request) {
        Ok(response) => Ok(warp::reply::with_status(
            warp::reply::json(&response),
            StatusCode::OK,
        )),
        Err(err) => {
            warn!("prediction failed: {err}");
            let (status, code) = status_for(&err);
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorResponse {
                    error: code.to_string(),
                    message: err.to_string(),
                }),
                status,
            ))
        }
    }
}

async fn handle_history(
    user: String,
    service: Arc<PredictionService>,
) -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&service.history_for(&user)))
}

async fn handle_delete_history(
    user: String,
    service: Arc<PredictionService>,
) -> Result<impl Reply, Infallible> {
    let removed = service.delete_user_history(&user);
    Ok(warp::reply::json(&serde_json::json!({ "removed": removed })))
}

async fn handle_advise(request: AdviseRequest) -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&advisor::advise(
        &request.message,
        &request.context,
    )))
}

/// HTTP status and stable error code for each failure class.
fn status_for(err: &FarecastError) -> (StatusCode, &'static str) {
    match err {
        FarecastError::SameOriginDestination(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        FarecastError::InvalidDate { .. } | FarecastError::InvalidTime { .. } => {
            (StatusCode::BAD_REQUEST, "validation_error")
        }
        FarecastError::UnknownCategory { .. } => (StatusCode::BAD_REQUEST, "unknown_category"),
        FarecastError::ModelUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "model_unavailable")
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    }
}
