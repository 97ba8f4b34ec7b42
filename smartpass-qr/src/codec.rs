//! Identifier to badge image, and back

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, instrument};

use crate::error::{QrError, QrResult};
use crate::options::QrOptions;
use crate::render::{ModuleGrid, rasterize, to_png};
use crate::url::VerificationUrl;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// A rendered badge code
#[derive(Clone, PartialEq, Eq)]
pub struct QrImage {
    payload: String,
    width: u32,
    png: Vec<u8>,
}

impl QrImage {
    /// The verification URL inside the code
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Side length in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// `data:image/png;base64,...`, the form stored in the `qrCode` field
    pub fn data_url(&self) -> String {
        format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&self.png))
    }
}

impl fmt::Debug for QrImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrImage")
            .field("payload", &self.payload)
            .field("width", &self.width)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Encode `identifier` as a badge for the deployment at `origin`.
///
/// Pure: no I/O, and equal inputs give byte-identical images.
pub fn encode(identifier: &str, origin: &str, options: &QrOptions) -> QrResult<QrImage> {
    let url = VerificationUrl::new(origin)?;
    encode_with(&url, identifier, options)
}

/// Same transform as [`encode`], for a record that already has a code
pub fn regenerate(identifier: &str, origin: &str, options: &QrOptions) -> QrResult<QrImage> {
    info!(identifier = %identifier, "regenerating badge code");
    encode(identifier, origin, options)
}

#[instrument(level = "debug", skip(url, options))]
fn encode_with(url: &VerificationUrl, identifier: &str, options: &QrOptions) -> QrResult<QrImage> {
    options.validate()?;
    let payload = url.build(identifier)?;
    render_payload(payload, options)
}

fn render_payload(payload: String, options: &QrOptions) -> QrResult<QrImage> {
    let grid = ModuleGrid::encode(&payload).inspect_err(|e| {
        tracing::error!(error = %e, payload_len = payload.len(), "QR encoding failed");
    })?;
    let image = rasterize(&grid, options)?;
    let png = to_png(&image)?;

    debug!(
        modules = grid.size(),
        width = image.width(),
        bytes = png.len(),
        "badge code rendered"
    );

    Ok(QrImage {
        payload,
        width: image.width(),
        png,
    })
}

/// Parse a stored `data:image/...;base64,...` value back to image bytes
pub fn decode_data_url(data_url: &str) -> QrResult<Vec<u8>> {
    let body = data_url
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, b64)| b64.trim())
        .ok_or_else(|| QrError::InvalidDataUrl("expected data:image/...;base64,".to_string()))?;

    STANDARD
        .decode(body)
        .map_err(|e| QrError::InvalidDataUrl(e.to_string()))
}

/// Codec bound to one deployment's origin, prefix and look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCodec {
    url: VerificationUrl,
    options: QrOptions,
}

impl QrCodec {
    pub fn new(url: VerificationUrl, options: QrOptions) -> QrResult<Self> {
        options.validate()?;
        Ok(Self { url, options })
    }

    /// Default `/p` prefix and default look
    pub fn for_origin(origin: &str) -> QrResult<Self> {
        Self::new(VerificationUrl::new(origin)?, QrOptions::default())
    }

    pub fn url(&self) -> &VerificationUrl {
        &self.url
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    pub fn encode(&self, identifier: &str) -> QrResult<QrImage> {
        encode_with(&self.url, identifier, &self.options)
    }

    pub fn regenerate(&self, identifier: &str) -> QrResult<QrImage> {
        info!(identifier = %identifier, "regenerating badge code");
        encode_with(&self.url, identifier, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://smartpass.example";

    #[test]
    fn test_encode_is_deterministic() {
        let opts = QrOptions::default();
        let a = encode("SP000123", ORIGIN, &opts).unwrap();
        let b = encode("SP000123", ORIGIN, &opts).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.data_url(), b.data_url());
    }

    #[test]
    fn test_payload_and_width() {
        let img = encode("SP000123", ORIGIN, &QrOptions::default()).unwrap();
        assert_eq!(img.payload(), "https://smartpass.example/p/SP000123");
        assert_eq!(img.width(), 512);
        assert!(img.png_bytes().starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_empty_identifier_gives_no_image() {
        let err = encode("", ORIGIN, &QrOptions::default()).unwrap_err();
        assert!(matches!(err, QrError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let err = encode("SP1", ORIGIN, &QrOptions::default().with_pixel_width(0)).unwrap_err();
        assert!(matches!(err, QrError::InvalidOptions(_)));
        assert!(QrCodec::new(
            VerificationUrl::new(ORIGIN).unwrap(),
            QrOptions::default().with_pixel_width(0)
        )
        .is_err());
    }

    #[test]
    fn test_oversized_payload_surfaces_encoding_failure() {
        let payload = "x".repeat(8000);
        let err = render_payload(payload, &QrOptions::default()).unwrap_err();
        assert!(matches!(err, QrError::EncodingFailure(_)));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_data_url_round_trip() {
        let img = encode("SP000123", ORIGIN, &QrOptions::default()).unwrap();
        let url = img.data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), img.png_bytes());
    }

    #[test]
    fn test_decode_data_url_rejects_other_values() {
        for bad in [
            "",
            "https://smartpass.example/qr.png",
            "data:text/plain;base64,aGk=",
            "data:image/png;base64,!!!",
        ] {
            assert!(
                matches!(decode_data_url(bad), Err(QrError::InvalidDataUrl(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_codec_matches_free_function() {
        let codec = QrCodec::for_origin(ORIGIN).unwrap();
        let direct = encode("SP 123/X", ORIGIN, &QrOptions::default()).unwrap();
        assert_eq!(codec.encode("SP 123/X").unwrap(), direct);
        assert_eq!(codec.regenerate("SP 123/X").unwrap(), direct);
    }

    #[test]
    fn test_debug_hides_bytes() {
        let img = encode("SP1", ORIGIN, &QrOptions::default()).unwrap();
        let dbg = format!("{img:?}");
        assert!(dbg.contains("png_len"));
        assert!(!dbg.contains("137, 80"));
    }
}
