/// Voice intent dispatch
///
/// Maps an intent name and its slots to a spoken reply. Intent names match the
/// voice skill's interaction model.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::{recommendations::Recommender, streaming::StreamingCatalog},
};

pub const RECOMMEND_INTENT: &str = "movieparserIntent";
pub const TOP_STREAMING_INTENT: &str = "topstreamingIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const LAUNCH_REQUEST: &str = "LaunchRequest";

/// Slot carrying the title to base recommendations on
pub const MOVIE_SLOT: &str = "movie";

const WELCOME_TEXT: &str =
    "Welcome to Movie Suggester. You can get movie recommendations by saying a movie name you like.";
const HELP_TEXT: &str = "You can use this app to get movie recommendations similar to the ones you like. \
     The data for the recommended movies come from real people's input on various websites like IMDB. \
     Would you like to tell a movie to get similar ones?";
const MISSING_TITLE_TEXT: &str =
    "Please make sure you specify the movie name based on which recommendations will be made";
const TOP_STREAMING_INTRO: &str = "The highly rated top 5 movies streaming are ";

#[derive(Debug, Clone, Deserialize)]
pub struct IntentRequest {
    pub intent: String,
    #[serde(default)]
    pub slots: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub speech: String,
    pub end_session: bool,
}

impl SpeechResponse {
    /// Reply that keeps the session open for a follow-up
    pub fn prompt(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            end_session: false,
        }
    }

    /// Reply that ends the session
    pub fn say(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            end_session: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Launch,
    Recommend { title: String },
    TopStreaming,
    Help,
    Stop,
    Cancel,
}

impl Intent {
    pub fn parse(request: &IntentRequest) -> AppResult<Self> {
        match request.intent.as_str() {
            LAUNCH_REQUEST => Ok(Intent::Launch),
            RECOMMEND_INTENT => Ok(Intent::Recommend {
                title: request
                    .slots
                    .get(MOVIE_SLOT)
                    .map(|title| title.trim().to_string())
                    .unwrap_or_default(),
            }),
            TOP_STREAMING_INTENT => Ok(Intent::TopStreaming),
            HELP_INTENT => Ok(Intent::Help),
            STOP_INTENT => Ok(Intent::Stop),
            CANCEL_INTENT => Ok(Intent::Cancel),
            other => Err(AppError::InvalidInput(format!("Invalid intent: {}", other))),
        }
    }
}

/// Produces the spoken reply for `intent`
pub async fn dispatch(
    intent: Intent,
    recommender: &Recommender,
    streaming: &StreamingCatalog,
) -> AppResult<SpeechResponse> {
    tracing::info!(intent = ?intent, "Dispatching intent");

    match intent {
        Intent::Launch => Ok(SpeechResponse::prompt(WELCOME_TEXT)),
        Intent::Help => Ok(SpeechResponse::prompt(HELP_TEXT)),
        Intent::Stop | Intent::Cancel => Ok(SpeechResponse::say("")),
        Intent::Recommend { title } if title.is_empty() => {
            Ok(SpeechResponse::say(MISSING_TITLE_TEXT))
        }
        Intent::Recommend { title } => match recommender.recommend(&title).await {
            Ok(recommendation) => Ok(SpeechResponse::say(recommendation.speech())),
            Err(AppError::NotFound(_)) => Ok(SpeechResponse::say(format!(
                "Sorry, I couldn't find a movie called {}",
                title
            ))),
            Err(e) => Err(e),
        },
        Intent::TopStreaming => {
            let titles = streaming.top_rated().await?;
            let names: Vec<&str> = titles.iter().map(|t| t.title.as_str()).collect();
            Ok(SpeechResponse::say(format!(
                "{}{}",
                TOP_STREAMING_INTRO,
                names.join(", ")
            )))
        }
    }
}
