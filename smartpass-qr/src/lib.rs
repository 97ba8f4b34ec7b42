//! # smartpass-qr
//!
//! QR identity codec for SmartPass badges.
//!
//! ## Scope
//!
//! This crate handles HOW a badge code is made:
//! - Verification URL construction (`<origin>/p/<identifier>`)
//! - QR encoding at a fixed error-correction level
//! - Rasterizing to a fixed width, quiet zone and color pair
//! - PNG / data URL packaging
//!
//! Saving the code onto an employee record (WHEN it is made) belongs to
//! `smartpass-client`. Nothing here touches the network or the disk.
//!
//! ## Example
//!
//! ```
//! use smartpass_qr::{QrOptions, encode};
//!
//! let image = encode("SP000123", "https://smartpass.example", &QrOptions::default())?;
//! assert_eq!(image.payload(), "https://smartpass.example/p/SP000123");
//! let stored = image.data_url(); // goes into the record's `qrCode` field
//! # assert!(stored.starts_with("data:image/png;base64,"));
//! # Ok::<(), smartpass_qr::QrError>(())
//! ```

mod codec;
mod error;
mod options;
mod render;
mod url;

// Re-exports
pub use codec::{QrCodec, QrImage, decode_data_url, encode, regenerate};
pub use error::{QrError, QrResult};
pub use options::{
    BRAND_DARK, BRAND_LIGHT, DEFAULT_MARGIN, DEFAULT_PIXEL_WIDTH, HexColor, MAX_MARGIN,
    MAX_PIXEL_WIDTH, QrOptions,
};
pub use render::ERROR_CORRECTION;
pub use url::{
    DEFAULT_PATH_PREFIX, MAX_IDENTIFIER_LEN, VerificationUrl, encode_path_segment,
    validate_identifier,
};
