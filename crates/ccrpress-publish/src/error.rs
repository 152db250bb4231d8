use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no accepted localization for {field} (tried {})", tried.join(", "))]
    MissingLocalization { field: String, tried: Vec<String> },

    #[error("no DOI field in upstream record: {0}")]
    MissingDoiInfo(String),

    #[error("DOI does not follow house style: {0}")]
    UnparseableDoi(String),

    #[error("submission {0} has no DOI and is not assigned to an issue")]
    IssueNotAssigned(u64),

    #[error("submission {0} has no authors")]
    NoAuthors(u64),

    #[error("family name {0:?} yields no ASCII letters for the DOI code")]
    EmptyAuthorCode(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    #[error("API error from {0}: {1}")]
    Api(String, String),

    #[error("unexpected upstream payload: {0}")]
    Payload(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("packaging error: {0}")]
    Packaging(#[from] zip::result::ZipError),
}

impl PublishError {
    /// True for faults caused by the upstream service rather than by the data.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable(_) | Self::Api(..))
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
