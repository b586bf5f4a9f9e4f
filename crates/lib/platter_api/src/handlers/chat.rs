//! Chat request handlers: session creation and chat turns.

use axum::Json;
use axum::extract::State;
use tracing::{debug, info};

use platter_core::recommend::RecommendRequest;
use platter_core::{restaurants, sessions};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::{ChatTurnData, ChatTurnRequest, Envelope, SessionData};

/// `POST /chat` — open a new chat session.
///
/// Every call creates a fresh session row; there is no idempotency key.
/// The returned `placeList` holds the operator-configured suggested
/// restaurants and is empty when none are configured.
pub async fn create_session(
    State(state): State<AppState>,
) -> AppResult<Json<Envelope<SessionData>>> {
    let chat_id = sessions::create_session(&state.pool).await?;
    info!(chat_id, "chat session created");

    let place_list =
        restaurants::find_by_ids(&state.pool, &state.config.suggested_restaurant_ids).await?;

    Ok(Json(Envelope::ok(
        "Chat session created.",
        SessionData {
            chat_id,
            place_list,
        },
    )))
}

/// `POST /chat/chatting` — persist one chat turn and answer with a reply
/// and a recommended restaurant list.
///
/// The turn insert and the restaurant read are independent auto-committed
/// statements: a failure after the insert leaves the turn persisted and
/// surfaces an error envelope. The stored row always holds exactly what the
/// caller submitted.
pub async fn chat_turn(
    State(state): State<AppState>,
    AppJson(body): AppJson<ChatTurnRequest>,
) -> AppResult<Json<Envelope<ChatTurnData>>> {
    let category_main = body
        .category
        .as_ref()
        .and_then(|c| c.main.as_deref())
        .filter(|s| !s.is_empty());
    let category_keywords = body
        .category
        .as_ref()
        .and_then(|c| c.keywords.as_deref())
        .filter(|s| !s.is_empty());
    let message = body.chat.as_deref().filter(|s| !s.is_empty());

    let turn = sessions::insert_turn(
        &state.pool,
        &sessions::NewChatTurn {
            session_id: body.chat_id,
            category_main,
            category_keywords,
            message,
        },
    )
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::NotFound(format!("chat session {} not found", body.chat_id))
        }
        _ => AppError::from(e),
    })?;
    debug!(turn_id = turn.id, chat_id = body.chat_id, "chat turn stored");

    let recommendation = state
        .recommender
        .recommend(&RecommendRequest {
            session_id: body.chat_id,
            category_main,
            category_keywords,
            message,
        })
        .await?;

    let place_list =
        restaurants::find_by_ids(&state.pool, &recommendation.restaurant_ids).await?;

    Ok(Json(Envelope::ok(
        "Chat reply delivered.",
        ChatTurnData {
            chat: recommendation.reply,
            place_list,
        },
    )))
}
