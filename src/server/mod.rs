//! HTTP front end: `POST /api/train` and `POST /api/predict`.
//!
//! The model fitted by the last successful `/api/train` is kept in memory
//! and used by `/api/predict` until the process exits.
mod handlers;

pub use handlers::{
    ErrorBody, INVALID_TRAINING_DATA, INVALID_X_VALUE, MODEL_NOT_TRAINED, PredictRequest,
    PredictResponse, TrainRequest, TrainResponse, router,
};

use std::{io, sync::Arc};

use log::{info, warn};
use tokio::{net::TcpListener, signal, sync::RwLock};

use crate::{config::TrainerConfig, model::LinearModel};

/// Address the server binds to when none is given.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";

/// State shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Hyperparameters used for fields a train request leaves out.
    config: TrainerConfig,
    model: Arc<RwLock<Option<LinearModel>>>,
}

impl AppState {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            model: Arc::new(RwLock::new(None)),
        }
    }

    /// The last trained model, if any.
    pub async fn model(&self) -> Option<LinearModel> {
        *self.model.read().await
    }
}

/// Serves the API on `listener` until ctrl-c is received.
pub async fn serve(listener: TcpListener, config: TrainerConfig) -> io::Result<()> {
    let app = router(AppState::new(config));

    info!("listening at {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("received SIGINT, shutting down"),
        Err(e) => {
            warn!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    }
}
