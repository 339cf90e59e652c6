use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{MetadataRecord, StreamingTitle},
    services::intents::{self, Intent, IntentRequest, SpeechResponse},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(rename = "movieName", default)]
    pub movie_name: String,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Metadata of titles similar to `movieName`
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<MetadataRecord>>> {
    let recommendation = state.recommender.recommend(&params.movie_name).await?;
    Ok(Json(recommendation.records().cloned().collect()))
}

/// Spoken recommendation text for `movieName`
pub async fn get_recommendation_speech(
    State(state): State<AppState>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<SpeechResponse>> {
    let recommendation = state.recommender.recommend(&params.movie_name).await?;
    Ok(Json(SpeechResponse::say(recommendation.speech())))
}

/// Top rated titles currently streaming
pub async fn get_top_streaming(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StreamingTitle>>> {
    let titles = state.streaming.top_rated().await?;
    Ok(Json(titles))
}

/// Voice intent endpoint
pub async fn handle_intent(
    State(state): State<AppState>,
    Json(request): Json<IntentRequest>,
) -> AppResult<Json<SpeechResponse>> {
    let intent = Intent::parse(&request)?;
    let response = intents::dispatch(intent, &state.recommender, &state.streaming).await?;
    Ok(Json(response))
}
