//! Chat session and chat turn persistence.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Row returned by chat turn queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatTurnRow {
    pub id: i64,
    pub session_id: i64,
    pub category_main: Option<String>,
    pub category_keywords: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new chat turn.
#[derive(Debug)]
pub struct NewChatTurn<'a> {
    pub session_id: i64,
    pub category_main: Option<&'a str>,
    pub category_keywords: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// Create a new chat session, returning its generated identifier.
///
/// Identifiers come from an identity column, so they are strictly increasing
/// and never reused even if a session row is later removed.
pub async fn create_session(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("INSERT INTO chat_sessions DEFAULT VALUES RETURNING id")
        .fetch_one(pool)
        .await
}

/// Persist one chat turn. Absent fields are stored as NULL.
///
/// Fails with a foreign-key violation when the session does not exist; the
/// caller maps that to its own not-found error.
pub async fn insert_turn(pool: &PgPool, turn: &NewChatTurn<'_>) -> Result<ChatTurnRow, sqlx::Error> {
    sqlx::query_as::<_, ChatTurnRow>(
        r#"
        INSERT INTO chat_turns (session_id, category_main, category_keywords, message)
        VALUES ($1, $2, $3, $4)
        RETURNING id, session_id, category_main, category_keywords, message, created_at
        "#,
    )
    .bind(turn.session_id)
    .bind(turn.category_main)
    .bind(turn.category_keywords)
    .bind(turn.message)
    .fetch_one(pool)
    .await
}
