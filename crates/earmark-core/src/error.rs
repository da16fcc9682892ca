use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid alias file: {0}")]
    Aliases(#[from] toml::de::Error),

    /// Required columns are absent or a source cannot be interpreted.
    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("not found: {entity} {key:?}")]
    NotFound { entity: &'static str, key: String },

    /// Every row was dropped before a corpus could be built.
    #[error("empty corpus: {0}")]
    EmptyCorpus(String),
}

impl Error {
    /// Returns `true` when the error indicates the entity was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            entity: "title",
            key: "dune".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: title \"dune\"");
    }

    #[test]
    fn test_other_errors_are_not_not_found() {
        assert!(!Error::DataFormat("no title column".into()).is_not_found());
        assert!(!Error::EmptyCorpus("all rows dropped".into()).is_not_found());
    }
}
