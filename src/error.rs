use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("projection not recognized: EPSG:{0}")]
    UnknownProjection(u32),

    #[error("section description: {0}")]
    Desc(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "im-io")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
