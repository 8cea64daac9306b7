use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    AverageRating, EntityReference, IndexDocument, Rating, RatingQuery, RatingQueryField,
    RatingsResult, SortOrder, UserReference,
};

/// One query against a store partition: a compiled filter expression, a
/// pagination window and at most one sort key.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexQuery {
    pub filter: String,
    pub offset: u64,
    pub rows: u64,
    pub sort: Option<SortClause>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortClause {
    pub field: RatingQueryField,
    pub order: SortOrder,
}

/// The documents matched by a query. `total` reports the full match count
/// regardless of the requested window, so a zero-row query still counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexHits {
    pub total: u64,
    pub documents: Vec<IndexDocument>,
}

/// A client bound to one store partition. Every write becomes visible to
/// reads issued after `commit` returns.
#[async_trait]
pub trait IndexClient: Send + Sync {
    async fn query(&self, request: &IndexQuery) -> RatingsResult<IndexHits>;
    async fn add(&self, document: IndexDocument) -> RatingsResult<()>;
    async fn delete_by_id(&self, id: &str) -> RatingsResult<()>;
    async fn commit(&self) -> RatingsResult<()>;
}

/// Hands out partition-bound clients, keyed by partition name.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    async fn client(&self, partition: &str) -> RatingsResult<Arc<dyn IndexClient>>;
}

/// Maintains the per-entity average aggregate in lock-step with rating
/// lifecycle transitions. Implementations must be safe under concurrent
/// invocation; the store calls each operation exactly once per transition.
#[async_trait]
pub trait AverageRatingCoordinator: Send + Sync {
    async fn add_vote(&self, entity: &EntityReference, vote: i64) -> RatingsResult<()>;
    async fn remove_vote(&self, entity: &EntityReference, vote: i64) -> RatingsResult<()>;
    async fn update_vote(
        &self,
        entity: &EntityReference,
        old_vote: i64,
        new_vote: i64,
    ) -> RatingsResult<()>;
    async fn get_average_rating(&self, entity: &EntityReference) -> RatingsResult<AverageRating>;
}

/// The rating store surface.
#[async_trait]
pub trait RatingsApi: Send + Sync {
    /// Counts the ratings matching `query` without fetching any document.
    async fn count_ratings(&self, query: &RatingQuery) -> RatingsResult<u64>;

    /// Returns the ratings matching `query` inside the given pagination
    /// window, sorted by a single key. A `limit` of zero or less yields an
    /// empty sequence.
    async fn get_ratings(
        &self,
        query: &RatingQuery,
        offset: u64,
        limit: i64,
        sort_field: RatingQueryField,
        order: SortOrder,
    ) -> RatingsResult<Vec<Rating>>;

    /// Looks up a single rating by identifier, scoped to this manager.
    async fn get_rating(&self, id: &str) -> RatingsResult<Option<Rating>>;

    /// Delegates entirely to the average-rating coordinator.
    async fn get_average_rating(&self, entity: &EntityReference)
        -> RatingsResult<AverageRating>;

    /// Creates, updates or deletes the rating of `author` on `entity`
    /// depending on the existing state, the vote and the zero-vote policy.
    /// Returns the stored rating, or `None` when nothing remains stored.
    async fn save_rating(
        &self,
        entity: &EntityReference,
        author: &UserReference,
        vote: i64,
    ) -> RatingsResult<Option<Rating>>;

    /// Deletes the rating with the given identifier. Returns `false`, with
    /// no side effects, when no such rating exists.
    async fn remove_rating(&self, id: &str) -> RatingsResult<bool>;
}
