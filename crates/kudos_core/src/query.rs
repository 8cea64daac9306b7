use serde::{Deserialize, Serialize};

use crate::{EntityReference, EntityType, Timestamp, UserReference};

/// The closed set of fields a rating query can filter and sort on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RatingQueryField {
    RatingId,
    ManagerId,
    EntityReference,
    EntityType,
    Author,
    Vote,
    Scale,
    CreatedDate,
    UpdatedDate,
}

impl RatingQueryField {
    /// The stored document field name for this query field.
    pub fn field_name(self) -> &'static str {
        match self {
            RatingQueryField::RatingId => "id",
            RatingQueryField::ManagerId => "managerId",
            RatingQueryField::EntityReference => "reference",
            RatingQueryField::EntityType => "entityType",
            RatingQueryField::Author => "author",
            RatingQueryField::Vote => "vote",
            RatingQueryField::Scale => "scale",
            RatingQueryField::CreatedDate => "createdDate",
            RatingQueryField::UpdatedDate => "updatedDate",
        }
    }
}

/// One filter criterion: a field together with its typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum RatingCriterion {
    Entity(EntityReference),
    EntityType(EntityType),
    Author(UserReference),
    ManagerId(String),
    RatingId(String),
    Vote(i64),
    Scale(i64),
    CreatedDate(Timestamp),
    UpdatedDate(Timestamp),
}

impl RatingCriterion {
    pub fn field(&self) -> RatingQueryField {
        match self {
            RatingCriterion::Entity(_) => RatingQueryField::EntityReference,
            RatingCriterion::EntityType(_) => RatingQueryField::EntityType,
            RatingCriterion::Author(_) => RatingQueryField::Author,
            RatingCriterion::ManagerId(_) => RatingQueryField::ManagerId,
            RatingCriterion::RatingId(_) => RatingQueryField::RatingId,
            RatingCriterion::Vote(_) => RatingQueryField::Vote,
            RatingCriterion::Scale(_) => RatingQueryField::Scale,
            RatingCriterion::CreatedDate(_) => RatingQueryField::CreatedDate,
            RatingCriterion::UpdatedDate(_) => RatingQueryField::UpdatedDate,
        }
    }
}

/// An ordered list of criteria; clause order in the compiled filter
/// expression follows insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingQuery {
    criteria: Vec<RatingCriterion>,
}

impl RatingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: RatingCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn entity(self, reference: EntityReference) -> Self {
        self.with(RatingCriterion::Entity(reference))
    }

    pub fn entity_type(self, entity_type: EntityType) -> Self {
        self.with(RatingCriterion::EntityType(entity_type))
    }

    pub fn author(self, author: UserReference) -> Self {
        self.with(RatingCriterion::Author(author))
    }

    pub fn manager_id(self, manager_id: impl Into<String>) -> Self {
        self.with(RatingCriterion::ManagerId(manager_id.into()))
    }

    pub fn rating_id(self, id: impl Into<String>) -> Self {
        self.with(RatingCriterion::RatingId(id.into()))
    }

    pub fn vote(self, vote: i64) -> Self {
        self.with(RatingCriterion::Vote(vote))
    }

    pub fn scale(self, scale: i64) -> Self {
        self.with(RatingCriterion::Scale(scale))
    }

    pub fn created_date(self, created: Timestamp) -> Self {
        self.with(RatingCriterion::CreatedDate(created))
    }

    pub fn updated_date(self, updated: Timestamp) -> Self {
        self.with(RatingCriterion::UpdatedDate(updated))
    }

    pub fn criteria(&self) -> &[RatingCriterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}
