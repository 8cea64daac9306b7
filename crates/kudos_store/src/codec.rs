//! Bidirectional mapping between index documents and typed rating
//! records. Decoding fails loudly on any missing or mistyped required
//! field; a silently defaulted field would let the average aggregate
//! drift without detection.

use std::sync::Arc;

use kudos_core::{
    AverageRating, EntityReferenceResolver, EntityType, FieldValue, IndexDocument,
    OpaqueEntityResolver, OpaqueUserResolver, Rating, RatingQueryField, RatingsError,
    RatingsResult, Timestamp, UserReferenceResolver,
};

pub const AVERAGE_VOTE_FIELD: &str = "averageVote";
pub const TOTAL_VOTE_FIELD: &str = "totalVote";

#[derive(Clone)]
pub struct RatingDocumentCodec {
    entities: Arc<dyn EntityReferenceResolver>,
    users: Arc<dyn UserReferenceResolver>,
}

impl RatingDocumentCodec {
    pub fn new(
        entities: Arc<dyn EntityReferenceResolver>,
        users: Arc<dyn UserReferenceResolver>,
    ) -> Self {
        Self { entities, users }
    }

    /// Codec backed by the passthrough resolvers.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(OpaqueEntityResolver), Arc::new(OpaqueUserResolver))
    }

    pub fn entities(&self) -> &dyn EntityReferenceResolver {
        self.entities.as_ref()
    }

    pub fn users(&self) -> &dyn UserReferenceResolver {
        self.users.as_ref()
    }

    pub fn decode_rating(&self, document: &IndexDocument) -> RatingsResult<Rating> {
        let id = self.required_str(document, RatingQueryField::RatingId.field_name())?;
        let manager_id = self.required_str(document, RatingQueryField::ManagerId.field_name())?;
        let entity_type = EntityType::parse(
            &self.required_str(document, RatingQueryField::EntityType.field_name())?,
        )?;
        let raw_reference =
            self.required_str(document, RatingQueryField::EntityReference.field_name())?;
        let entity = self.entities.resolve(&raw_reference, entity_type)?;
        let raw_author = self.required_str(document, RatingQueryField::Author.field_name())?;
        let author = self.users.resolve(&raw_author)?;
        let vote = self.required_int(document, RatingQueryField::Vote.field_name())?;
        let scale = self.required_int(document, RatingQueryField::Scale.field_name())?;
        let created_at =
            self.required_time(document, RatingQueryField::CreatedDate.field_name())?;
        let updated_at =
            self.required_time(document, RatingQueryField::UpdatedDate.field_name())?;
        Rating::builder()
            .id(id)
            .manager_id(manager_id)
            .entity(entity)
            .author(author)
            .vote(vote)
            .scale(scale)
            .created_at(created_at)
            .updated_at(updated_at)
            .build()
    }

    /// Writes all nine required fields; every save rewrites the complete
    /// document, there is no partial-update primitive.
    pub fn encode_rating(&self, rating: &Rating) -> IndexDocument {
        let mut document = IndexDocument::new();
        document.set(
            RatingQueryField::RatingId.field_name(),
            FieldValue::Str(rating.id().to_string()),
        );
        document.set(
            RatingQueryField::ManagerId.field_name(),
            FieldValue::Str(rating.manager_id().to_string()),
        );
        document.set(
            RatingQueryField::EntityReference.field_name(),
            FieldValue::Str(self.entities.serialize(rating.entity())),
        );
        document.set(
            RatingQueryField::EntityType.field_name(),
            FieldValue::Str(rating.entity().entity_type.as_str().to_string()),
        );
        document.set(
            RatingQueryField::Author.field_name(),
            FieldValue::Str(self.users.serialize(rating.author())),
        );
        document.set(RatingQueryField::Vote.field_name(), FieldValue::Int(rating.vote()));
        document.set(RatingQueryField::Scale.field_name(), FieldValue::Int(rating.scale()));
        document.set(
            RatingQueryField::CreatedDate.field_name(),
            FieldValue::Time(rating.created_at()),
        );
        document.set(
            RatingQueryField::UpdatedDate.field_name(),
            FieldValue::Time(rating.updated_at()),
        );
        document
    }

    pub fn decode_average(&self, document: &IndexDocument) -> RatingsResult<AverageRating> {
        let id = self.required_str(document, RatingQueryField::RatingId.field_name())?;
        let manager_id = self.required_str(document, RatingQueryField::ManagerId.field_name())?;
        let entity_type = EntityType::parse(
            &self.required_str(document, RatingQueryField::EntityType.field_name())?,
        )?;
        let raw_reference =
            self.required_str(document, RatingQueryField::EntityReference.field_name())?;
        let entity = self.entities.resolve(&raw_reference, entity_type)?;
        let average_vote = self.required_float(document, AVERAGE_VOTE_FIELD)?;
        let total_vote = self.required_int(document, TOTAL_VOTE_FIELD)?;
        if total_vote < 0 {
            return Err(decode_error(document, TOTAL_VOTE_FIELD, "non-negative integer"));
        }
        let scale = self.required_int(document, RatingQueryField::Scale.field_name())?;
        let updated_at =
            self.required_time(document, RatingQueryField::UpdatedDate.field_name())?;
        AverageRating::builder()
            .id(id)
            .manager_id(manager_id)
            .entity(entity)
            .average_vote(average_vote)
            .total_vote(total_vote as u64)
            .scale(scale)
            .updated_at(updated_at)
            .build()
    }

    pub fn encode_average(&self, average: &AverageRating) -> IndexDocument {
        let mut document = IndexDocument::new();
        document.set(
            RatingQueryField::RatingId.field_name(),
            FieldValue::Str(average.id().to_string()),
        );
        document.set(
            RatingQueryField::ManagerId.field_name(),
            FieldValue::Str(average.manager_id().to_string()),
        );
        document.set(
            RatingQueryField::EntityReference.field_name(),
            FieldValue::Str(self.entities.serialize(average.entity())),
        );
        document.set(
            RatingQueryField::EntityType.field_name(),
            FieldValue::Str(average.entity().entity_type.as_str().to_string()),
        );
        document.set(AVERAGE_VOTE_FIELD, FieldValue::Float(average.average_vote()));
        document.set(TOTAL_VOTE_FIELD, FieldValue::Int(average.total_vote() as i64));
        document.set(RatingQueryField::Scale.field_name(), FieldValue::Int(average.scale()));
        document.set(
            RatingQueryField::UpdatedDate.field_name(),
            FieldValue::Time(average.updated_at()),
        );
        document
    }

    fn required_str(&self, document: &IndexDocument, field: &str) -> RatingsResult<String> {
        document
            .str_value(field)
            .map(ToOwned::to_owned)
            .ok_or_else(|| decode_error(document, field, "string"))
    }

    fn required_int(&self, document: &IndexDocument, field: &str) -> RatingsResult<i64> {
        document
            .int_value(field)
            .ok_or_else(|| decode_error(document, field, "integer"))
    }

    fn required_float(&self, document: &IndexDocument, field: &str) -> RatingsResult<f64> {
        document
            .float_value(field)
            .ok_or_else(|| decode_error(document, field, "float"))
    }

    fn required_time(&self, document: &IndexDocument, field: &str) -> RatingsResult<Timestamp> {
        document
            .time_value(field)
            .ok_or_else(|| decode_error(document, field, "timestamp"))
    }
}

fn decode_error(document: &IndexDocument, field: &str, expected: &str) -> RatingsError {
    let id = document.str_value("id").unwrap_or("<unknown>");
    RatingsError::decode(format!(
        "document [{id}] is missing or mistypes the {expected} field [{field}]"
    ))
}
