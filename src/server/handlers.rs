use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task;
use tower_http::cors::CorsLayer;

use super::AppState;
use crate::{config::TrainerConfig, model::LinearModel, report::TrainingReport};

pub const INVALID_TRAINING_DATA: &str =
    "Invalid input data. Ensure X and Y are non-empty arrays of the same length.";
pub const MODEL_NOT_TRAINED: &str = "Model not trained yet. Train the model first.";
pub const INVALID_X_VALUE: &str = "Invalid input. x_value must be a number.";

/// Builds the API router over `state`. Any origin may call it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/train", post(train))
        .route("/api/predict", post(predict))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Body of `POST /api/train`. Omitted hyperparameters fall back to the
/// server's configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRequest {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

impl TrainRequest {
    fn config(&self, base: TrainerConfig) -> TrainerConfig {
        TrainerConfig {
            learning_rate: self.learning_rate.unwrap_or(base.learning_rate),
            max_epochs: self.max_iterations.unwrap_or(base.max_epochs),
            batch_size: self.batch_size.unwrap_or(base.batch_size),
            seed: base.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainResponse {
    pub slope: f64,
    pub intercept: f64,
    #[serde(rename = "trainingTimeMs")]
    pub training_time_ms: u64,
    pub mse: f64,
    pub r_squared: f64,
}

impl From<&TrainingReport> for TrainResponse {
    fn from(report: &TrainingReport) -> Self {
        Self {
            slope: report.slope,
            intercept: report.intercept,
            training_time_ms: report.training_time_ms(),
            mse: report.metrics.mse,
            r_squared: report.metrics.r_squared,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub x_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: f64,
}

/// JSON body of every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

async fn train(
    State(state): State<AppState>,
    payload: Result<Json<TrainRequest>, JsonRejection>,
) -> Result<Json<TrainResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        debug!("rejected train body: {e}");
        ApiError::bad_request(INVALID_TRAINING_DATA)
    })?;

    if request.x_values.is_empty() || request.x_values.len() != request.y_values.len() {
        return Err(ApiError::bad_request(INVALID_TRAINING_DATA));
    }

    let config = request.config(state.config);
    info!(
        samples = request.x_values.len(),
        learning_rate = config.learning_rate,
        max_epochs = config.max_epochs,
        batch_size = config.batch_size;
        "train request"
    );

    let TrainRequest {
        x_values, y_values, ..
    } = request;

    // Fitting is CPU bound and runs on rayon, off the async workers.
    let report = task::spawn_blocking(move || TrainingReport::run(&x_values, &y_values, &config))
        .await
        .map_err(|e| ApiError::internal(format!("Training failed: {e}")))?
        .map_err(|e| {
            warn!("training failed: {e}");
            ApiError::internal(format!("Training failed: {e}"))
        })?;

    if !report.slope.is_finite() || !report.intercept.is_finite() {
        warn!(slope = report.slope, intercept = report.intercept; "training diverged");
        return Err(ApiError::internal(
            "Training diverged to non-finite parameters. Try a smaller learning rate.",
        ));
    }

    *state.model.write().await = Some(LinearModel::new(report.slope, report.intercept));

    Ok(Json(TrainResponse::from(&report)))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Some(model) = state.model().await else {
        return Err(ApiError::bad_request(MODEL_NOT_TRAINED));
    };

    let Json(request) = payload.map_err(|e| {
        debug!("rejected predict body: {e}");
        ApiError::bad_request(INVALID_X_VALUE)
    })?;

    Ok(Json(PredictResponse {
        prediction: model.predict(request.x_value),
    }))
}
