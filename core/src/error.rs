use thiserror::Error;

/// Feiltaksonomi for beregningslaget.
///
/// Ingen av disse slipper ut av de fire beregningskomponentene; de brukes
/// internt og ved grensesnittene (provider-kall, payload-parsing) og løses
/// opp til nøytrale standardverdier.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("upstream fetch failed for athlete `{athlete_id}`: {reason}")]
    UpstreamFetch { athlete_id: String, reason: String },

    #[error("no impact table entry for {gene} {genotype}")]
    UnknownGene { gene: String, genotype: String },

    #[error("invalid payload at `{path}`: {message}")]
    InvalidPayload { path: String, message: String },
}

impl MetricsError {
    pub fn upstream(athlete_id: &str, reason: impl Into<String>) -> Self {
        MetricsError::UpstreamFetch {
            athlete_id: athlete_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type MetricsResult<T> = Result<T, MetricsError>;
