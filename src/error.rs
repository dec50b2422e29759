//! Error type shared by the scoring engine and its meta-strategies.

use thiserror::Error;

/// Fatal, pre-scan failures. Per-token anomalies never surface here: a
/// malformed token is skipped and the scan carries on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    /// No lexicon was attached to the pipeline.
    #[error("configuration error: no lexicon attached to the pipeline")]
    LexiconMissing,

    /// A lexicon is attached but holds no data.
    #[error("configuration error: lexicon '{0}' is not loaded")]
    LexiconNotLoaded(String),

    /// Untagged input was submitted but the pipeline has no tagger.
    #[error("configuration error: untagged input requires a tagger")]
    TaggerMissing,

    /// The tag separator could not be determined from the first tokens.
    #[error("unable to detect tag separator in {excerpt:?}")]
    TagSeparator { excerpt: String },

    #[error("unknown pipeline '{0}'")]
    UnknownPipeline(String),

    #[error("no pipelines registered")]
    NoPipelines,
}

impl ScoreError {
    /// Build a separator error carrying at most the first 100 characters.
    pub fn tag_separator(doc: &str) -> Self {
        Self::TagSeparator {
            excerpt: doc.chars().take(100).collect(),
        }
    }

    /// True for the "precondition not met" family.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::LexiconMissing | Self::LexiconNotLoaded(_) | Self::TaggerMissing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_is_truncated() {
        let doc = "x".repeat(250);
        match ScoreError::tag_separator(&doc) {
            ScoreError::TagSeparator { excerpt } => assert_eq!(excerpt.len(), 100),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn configuration_family() {
        assert!(ScoreError::LexiconMissing.is_configuration());
        assert!(ScoreError::TaggerMissing.is_configuration());
        assert!(!ScoreError::NoPipelines.is_configuration());
    }
}
