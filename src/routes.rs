use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

use crate::classifier::ImageUpload;
use crate::error::ApiError;
use crate::state::AppState;

pub const HEALTH_MESSAGE: &str = "Voice Plant Classifier API is running 🚀";
pub const AUDIO_URL: &str = "/get_audio";
pub const AUDIO_ID_HEADER: &str = "x-audio-id";

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub confidence: f64,
    pub message: String,
    pub audio_url: String,
}

/// Full application: routes plus CORS, tracing and the upload limit
pub fn app(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;
    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/", get(health_check))
        .route("/predict/", post(predict))
        .route("/predict", post(predict))
        .route("/get_audio", get(get_latest_audio))
        .route("/get_audio/:id", get(get_audio_by_id))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "message": HEALTH_MESSAGE }))
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let result = match multipart {
        Ok(multipart) => run_prediction(&state, multipart).await,
        Err(rejection) => Err(rejection.into()),
    };
    if let Err(e) = &result {
        error!("❌ Error: {}", e);
    }
    result
}

async fn run_prediction(state: &AppState, multipart: Multipart) -> Result<Response, ApiError> {
    let image = read_image_field(multipart).await?;

    let prediction = state.classifier.predict(image).await?;
    let message = prediction.narration();

    let audio = state.synthesizer.synthesize(&message).await?;
    let audio_id = state.audio.insert(audio).await;

    info!("✅ Prediction: {}", message);

    let body = PredictResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
        message,
        audio_url: AUDIO_URL.to_string(),
    };
    Ok(([(AUDIO_ID_HEADER, audio_id.to_string())], Json(body)).into_response())
}

async fn read_image_field(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let mut image = ImageUpload::new(bytes.to_vec());
        image.file_name = file_name;
        image.content_type = content_type;
        return Ok(image);
    }

    Err(ApiError::MissingFile(
        "Missing multipart field 'file'".to_string(),
    ))
}

async fn get_latest_audio(State(state): State<AppState>) -> Result<Response, ApiError> {
    let clip = state.audio.latest().await.ok_or(ApiError::AudioNotFound)?;
    Ok(audio_response(clip.audio))
}

async fn get_audio_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::AudioNotFound)?;
    let clip = state.audio.get(&id).ok_or(ApiError::AudioNotFound)?;
    Ok(audio_response(clip.audio))
}

fn audio_response(audio: axum::body::Bytes) -> Response {
    ([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response()
}
