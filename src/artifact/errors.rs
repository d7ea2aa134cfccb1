use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("QR encoding error: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("QR image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("QR artifact IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("QR artifact has no renderable surface")]
    EmptySurface
}
