use serde::{Deserialize, Serialize};

use crate::{EntityReference, RatingsError, RatingsResult, Timestamp, UserReference};

/// One vote cast by one user on one entity. Immutable after construction;
/// the `with_*` methods return a new value. Equality is structural.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    id: String,
    manager_id: String,
    entity: EntityReference,
    author: UserReference,
    vote: i64,
    scale: i64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Rating {
    pub fn builder() -> RatingBuilder {
        RatingBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn manager_id(&self) -> &str {
        &self.manager_id
    }

    pub fn entity(&self) -> &EntityReference {
        &self.entity
    }

    pub fn author(&self) -> &UserReference {
        &self.author
    }

    pub fn vote(&self) -> i64 {
        self.vote
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn with_vote(mut self, vote: i64) -> Self {
        self.vote = vote;
        self
    }

    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = updated_at;
        self
    }
}

#[derive(Debug, Default)]
pub struct RatingBuilder {
    id: String,
    manager_id: String,
    entity: Option<EntityReference>,
    author: Option<UserReference>,
    vote: i64,
    scale: i64,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
}

impl RatingBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn manager_id(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = manager_id.into();
        self
    }

    pub fn entity(mut self, entity: EntityReference) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn author(mut self, author: UserReference) -> Self {
        self.author = Some(author);
        self
    }

    pub fn vote(mut self, vote: i64) -> Self {
        self.vote = vote;
        self
    }

    pub fn scale(mut self, scale: i64) -> Self {
        self.scale = scale;
        self
    }

    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn build(self) -> RatingsResult<Rating> {
        let entity = self
            .entity
            .ok_or_else(|| RatingsError::validation("rating is missing its entity reference"))?;
        let author = self
            .author
            .ok_or_else(|| RatingsError::validation("rating is missing its author"))?;
        let created_at = self
            .created_at
            .ok_or_else(|| RatingsError::validation("rating is missing its created date"))?;
        let updated_at = self
            .updated_at
            .ok_or_else(|| RatingsError::validation("rating is missing its updated date"))?;
        Ok(Rating {
            id: self.id,
            manager_id: self.manager_id,
            entity,
            author,
            vote: self.vote,
            scale: self.scale,
            created_at,
            updated_at,
        })
    }
}

/// The derived aggregate for one (manager, entity) pair. Maintained by the
/// average-rating coordinator, never computed by the store itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AverageRating {
    id: String,
    manager_id: String,
    entity: EntityReference,
    average_vote: f64,
    total_vote: u64,
    scale: i64,
    updated_at: Timestamp,
}

impl AverageRating {
    pub fn builder() -> AverageRatingBuilder {
        AverageRatingBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn manager_id(&self) -> &str {
        &self.manager_id
    }

    pub fn entity(&self) -> &EntityReference {
        &self.entity
    }

    pub fn average_vote(&self) -> f64 {
        self.average_vote
    }

    pub fn total_vote(&self) -> u64 {
        self.total_vote
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

#[derive(Debug, Default)]
pub struct AverageRatingBuilder {
    id: String,
    manager_id: String,
    entity: Option<EntityReference>,
    average_vote: f64,
    total_vote: u64,
    scale: i64,
    updated_at: Option<Timestamp>,
}

impl AverageRatingBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn manager_id(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = manager_id.into();
        self
    }

    pub fn entity(mut self, entity: EntityReference) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn average_vote(mut self, average_vote: f64) -> Self {
        self.average_vote = average_vote;
        self
    }

    pub fn total_vote(mut self, total_vote: u64) -> Self {
        self.total_vote = total_vote;
        self
    }

    pub fn scale(mut self, scale: i64) -> Self {
        self.scale = scale;
        self
    }

    pub fn updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn build(self) -> RatingsResult<AverageRating> {
        let entity = self.entity.ok_or_else(|| {
            RatingsError::validation("average rating is missing its entity reference")
        })?;
        let updated_at = self.updated_at.ok_or_else(|| {
            RatingsError::validation("average rating is missing its updated date")
        })?;
        Ok(AverageRating {
            id: self.id,
            manager_id: self.manager_id,
            entity,
            average_vote: self.average_vote,
            total_vote: self.total_vote,
            scale: self.scale,
            updated_at,
        })
    }
}
