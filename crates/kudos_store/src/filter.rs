//! Compiles ordered query criteria into the index filter language: a
//! conjunction of `filter(field:value)` clauses, one per criterion, in
//! criteria order. Colon separates field from value, so encoded values get
//! their colons backslash-escaped.

use kudos_core::{
    EntityReferenceResolver, RatingCriterion, RatingQueryField, RatingsError, RatingsResult,
    UserReferenceResolver,
};

/// Escapes the filter-language separator inside an encoded value.
pub fn escape_filter_value(value: &str) -> String {
    value.replace(':', "\\:")
}

pub fn unescape_filter_value(value: &str) -> String {
    value.replace("\\:", ":")
}

/// Field-specific encoding of one criterion into its query string form.
/// Safe to call uniformly: values without colons escape to themselves.
pub fn encode_criterion(
    criterion: &RatingCriterion,
    entities: &dyn EntityReferenceResolver,
    users: &dyn UserReferenceResolver,
) -> (RatingQueryField, String) {
    let value = match criterion {
        RatingCriterion::Entity(reference) => entities.serialize(reference),
        RatingCriterion::EntityType(entity_type) => entity_type.as_str().to_string(),
        RatingCriterion::Author(user) => users.serialize(user),
        RatingCriterion::ManagerId(manager_id) => manager_id.clone(),
        RatingCriterion::RatingId(id) => id.clone(),
        RatingCriterion::Vote(vote) => vote.to_string(),
        RatingCriterion::Scale(scale) => scale.to_string(),
        RatingCriterion::CreatedDate(created) => created.as_millis().to_string(),
        RatingCriterion::UpdatedDate(updated) => updated.as_millis().to_string(),
    };
    (criterion.field(), value)
}

/// Compiles criteria into a single filter expression. Deterministic for
/// identical criteria order; an empty slice compiles to the empty string.
pub fn compile_filter(
    criteria: &[RatingCriterion],
    entities: &dyn EntityReferenceResolver,
    users: &dyn UserReferenceResolver,
) -> String {
    criteria
        .iter()
        .map(|criterion| {
            let (field, value) = encode_criterion(criterion, entities, users);
            format!("filter({}:{})", field.field_name(), escape_filter_value(&value))
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Parses a compiled expression back into (field name, unescaped value)
/// pairs. Used by the in-memory index backend to interpret queries.
pub fn parse_filter(expression: &str) -> RatingsResult<Vec<(String, String)>> {
    if expression.is_empty() {
        return Ok(Vec::new());
    }
    expression
        .split(" AND ")
        .map(|clause| {
            let inner = clause
                .strip_prefix("filter(")
                .and_then(|rest| rest.strip_suffix(')'))
                .ok_or_else(|| {
                    RatingsError::storage(format!("malformed filter clause [{clause}]"))
                })?;
            let split = unescaped_colon(inner).ok_or_else(|| {
                RatingsError::storage(format!("filter clause without separator [{clause}]"))
            })?;
            let (field, value) = (&inner[..split], &inner[split + 1..]);
            Ok((field.to_string(), unescape_filter_value(value)))
        })
        .collect()
}

/// Index of the first colon not preceded by a backslash.
fn unescaped_colon(clause: &str) -> Option<usize> {
    let bytes = clause.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|(idx, byte)| **byte == b':' && (*idx == 0 || bytes[idx - 1] != b'\\'))
        .map(|(idx, _)| idx)
}
