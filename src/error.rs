use std::path::PathBuf;
use thiserror::Error;

/// Typed failures of the charting layer.
///
/// None of these escape a render call; they surface from configuration loading and from
/// finishing a backend (writing the output file).
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid colour {0:?}, expected #rrggbb or #rgb")]
    InvalidColor(String),

    #[error("cannot read theme file {path}")]
    ThemeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse theme file {path}")]
    ThemeParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("drawing backend error: {0}")]
    Backend(String),
}
