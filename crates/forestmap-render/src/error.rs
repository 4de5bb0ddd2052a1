pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The text measurer produced metrics layout cannot size a box from.
    /// Fatal: guessing a width would silently mis-size every site.
    #[error("text measurement returned unusable metrics for {text:?}")]
    TextMetrics { text: String },

    #[error("surface error: {0}")]
    Surface(String),

    #[error(transparent)]
    Core(#[from] forestmap_core::Error),
}
