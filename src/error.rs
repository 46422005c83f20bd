use thiserror::Error;

/// Failures local to a single extraction tier.
///
/// These never escape a scrape: the pipeline turns them into "try the next
/// tier" and only logs them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The field is absent from the parsed schema.org graph
    #[error("{0} not found in structured data")]
    NotFoundInStructuredData(&'static str),

    /// A strict OpenGraph accessor found no matching meta tag
    #[error("{0} not found in OpenGraph metadata")]
    NotFoundInOpenGraph(&'static str),

    /// None of totalTime, prepTime or cookTime exist in the recipe
    #[error("No time information in structured data")]
    NoTimeInfo,

    /// A single JSON-LD block could not be decoded
    #[error("Malformed JSON-LD payload in block {index}: {reason}")]
    MalformedPayload { index: usize, reason: String },

    /// Time text matched no recognised duration grammar
    #[error("Invalid duration text: {0:?}")]
    InvalidDurationText(String),

    /// Yield value could not be read as text
    #[error("Invalid yield text: {0:?}")]
    InvalidYieldText(String),

    /// A value had a JSON shape (or override value kind) the field cannot use
    #[error("Unexpected value for {field}: expected {expected}")]
    UnexpectedShape {
        field: &'static str,
        expected: &'static str,
    },
}

/// Errors returned to callers of the scraper.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Every tier missed a mandatory field
    #[error("Required field missing: {0}")]
    RequiredFieldMissing(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A site override was configured with a selector that does not parse
    #[error("Invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A site override names a field the record does not have
    #[error("Unknown recipe field: {0}")]
    UnknownField(String),
}
