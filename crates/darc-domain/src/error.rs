use darc_types::PluginId;

/// Everything that can stop a plugin from being registered or a judgement from completing.
///
/// None of these is ever read as an implicit `false` or as an approval.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum JudgeError {
    #[error("invalid predicate `{predicate}`: {reason}")]
    InvalidPredicate { predicate: String, reason: String },

    #[error("invalid condition: {0}")]
    InvalidCondition(String),

    #[error("condition tree exceeds the maximum depth of {max_depth} levels")]
    TreeTooDeep { max_depth: usize },

    #[error("plugin not found: {0}")]
    NotFound(PluginId),

    #[error("judgement cancelled before completion")]
    Cancelled,
}

impl JudgeError {
    pub(crate) fn invalid_predicate(predicate: &str, reason: impl Into<String>) -> Self {
        JudgeError::InvalidPredicate {
            predicate: predicate.to_string(),
            reason: reason.into(),
        }
    }
}
