pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "invalid resolution {width}x{height}: each dimension must be a positive multiple of 8"
    )]
    InvalidResolution { width: i32, height: i32 },

    #[error("failed to spawn the discovery thread: {0}")]
    SpawnDiscovery(#[from] std::io::Error),
}
