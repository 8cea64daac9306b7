use async_trait::async_trait;

use serde::{Deserialize, Serialize};

use crate::Rating;

/// A rating lifecycle transition, carrying the affected rating. Updates
/// also carry the vote the rating held before the change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RatingEvent {
    Created(Rating),
    Updated { rating: Rating, previous_vote: i64 },
    Deleted(Rating),
}

impl RatingEvent {
    pub fn rating(&self) -> &Rating {
        match self {
            RatingEvent::Created(rating) => rating,
            RatingEvent::Updated { rating, .. } => rating,
            RatingEvent::Deleted(rating) => rating,
        }
    }
}

/// Receives one notification per rating lifecycle transition. Downstream
/// consumers use these for cache invalidation and UI refresh; dispatch
/// fan-out is the sink's concern, not the store's.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, manager_id: &str, event: RatingEvent);
}
