use thiserror::Error;

#[derive(Debug, Error)]
pub enum RatingsError {
    #[error("validation error: {message}")]
    Validation { message: String },
    #[error("storage error: {message}")]
    Storage { message: String },
    #[error("decode error: {message}")]
    Decode { message: String },
}

impl RatingsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Raised before any index interaction when a vote falls outside
    /// `[0, scale]`. The message names the vote, the scale and the manager.
    pub fn out_of_scale(vote: i64, scale: i64, manager_id: &str) -> Self {
        Self::validation(format!(
            "The vote [{vote}] is out of scale [{scale}] for [{manager_id}] ratings manager."
        ))
    }
}

pub type RatingsResult<T> = Result<T, RatingsError>;

#[cfg(test)]
mod tests {
    use super::RatingsError;

    #[test]
    fn helper_constructors_set_variants() {
        let err = RatingsError::validation("bad vote");
        assert!(matches!(err, RatingsError::Validation { .. }));
        let err = RatingsError::storage("index unreachable");
        assert!(matches!(err, RatingsError::Storage { .. }));
        let err = RatingsError::decode("missing field");
        assert!(matches!(err, RatingsError::Decode { .. }));
    }

    #[test]
    fn out_of_scale_names_vote_scale_and_manager() {
        let err = RatingsError::out_of_scale(8, 5, "saveRating1");
        assert_eq!(
            err.to_string(),
            "validation error: The vote [8] is out of scale [5] for [saveRating1] ratings manager."
        );
    }
}
