pub mod barcode;
pub mod email;
pub mod pdf;
pub mod pipeline;
pub mod qr;

pub use email::EmailService;
pub use pipeline::{IssuanceError, IssuanceReceipt, Stage, TicketIssuer};

/// 8-bit grayscale raster produced by the encoders and embedded into the
/// rendered ticket. Row-major, 0 = black, 255 = white.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("barcode encoding failed: {0}")]
    Barcode(String),

    #[error("qr encoding failed: {0}")]
    Qr(String),
}
