use thiserror::Error;

use crate::api::FigureKind;
use crate::render::BackendKind;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("figure kind `{kind:?}` is not supported by the {backend:?} back end")]
    UnsupportedFigure {
        kind: FigureKind,
        backend: BackendKind,
    },

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ChartError {
    pub(crate) fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }
}
