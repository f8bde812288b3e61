/// Fatal configuration failures. An incorrect rule table must never silently
/// under- or over-apply conditions, so any of these aborts the batch before a
/// single report is trusted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no position rules configured for category '{category}'")]
    UnknownCategory { category: String },
    #[error("condition id {id} is outside the catalog range 1..=10")]
    UnknownCondition { id: u8 },
    #[error("invalid title pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("malformed rule table: {detail}")]
    MalformedRuleTable { detail: String },
}
