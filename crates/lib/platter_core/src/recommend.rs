//! Recommendation seam.
//!
//! The AI reply and restaurant matching are not implemented yet; this module
//! defines the boundary they will plug into. `StubRecommender` is the only
//! implementation for now and returns a fixed reply and ID list regardless
//! of its input.

use async_trait::async_trait;
use thiserror::Error;

/// Placeholder reply returned until a real model is wired in.
const STUB_REPLY: &str = "This is where the AI reply will go.";

/// Placeholder recommendation IDs returned until a real model is wired in.
const STUB_RESTAURANT_IDS: [i64; 3] = [10, 20, 30];

/// Errors from a recommendation backend.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("recommendation backend unavailable: {0}")]
    Unavailable(String),
}

/// Input to a recommendation: everything known about the current turn.
#[derive(Debug, Clone)]
pub struct RecommendRequest<'a> {
    pub session_id: i64,
    pub category_main: Option<&'a str>,
    pub category_keywords: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// One recommendation: a reply to show the user and an ordered list of
/// restaurant identifiers, best match first.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub reply: String,
    pub restaurant_ids: Vec<i64>,
}

/// A recommendation backend.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        request: &RecommendRequest<'_>,
    ) -> Result<Recommendation, RecommendError>;
}

/// Fixed-output recommender standing in for the unimplemented AI component.
#[derive(Debug, Clone)]
pub struct StubRecommender {
    reply: String,
    restaurant_ids: Vec<i64>,
}

impl StubRecommender {
    pub fn new(reply: impl Into<String>, restaurant_ids: Vec<i64>) -> Self {
        Self {
            reply: reply.into(),
            restaurant_ids,
        }
    }
}

impl Default for StubRecommender {
    fn default() -> Self {
        Self::new(STUB_REPLY, STUB_RESTAURANT_IDS.to_vec())
    }
}

#[async_trait]
impl Recommender for StubRecommender {
    async fn recommend(
        &self,
        _request: &RecommendRequest<'_>,
    ) -> Result<Recommendation, RecommendError> {
        Ok(Recommendation {
            reply: self.reply.clone(),
            restaurant_ids: self.restaurant_ids.clone(),
        })
    }
}
