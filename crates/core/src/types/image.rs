//! Inline-encoded image references.

use core::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`ImageReference`] from a data URL.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageReferenceError {
    /// The input does not start with `data:`.
    #[error("image reference must be a data: URL")]
    MissingScheme,
    /// There is no `,` between the header and the payload.
    #[error("data URL has no payload")]
    MissingPayload,
    /// The header has no MIME type.
    #[error("data URL has no MIME type")]
    EmptyMimeType,
    /// The payload is not marked `;base64`.
    #[error("data URL payload must be base64 encoded")]
    NotBase64,
    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// An image held in memory as base64 text plus its declared MIME type.
///
/// This is what the studio gallery stores and what the server receives. It
/// serializes as a data URL (`data:image/png;base64,...`) so it can be
/// embedded directly in JSON or HTML.
///
/// ## Examples
///
/// ```
/// use lingofy_core::ImageReference;
///
/// let image = ImageReference::from_bytes("image/png", &[0x89, b'P', b'N', b'G']);
/// assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw==");
///
/// let parsed = ImageReference::parse_data_url(&image.to_data_url()).unwrap();
/// assert_eq!(parsed, image);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageReference {
    mime_type: String,
    data: String,
}

impl ImageReference {
    /// Encode raw image bytes.
    #[must_use]
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Wrap an already base64-encoded payload, e.g. one returned by the AI
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the MIME type is empty or `data` is not valid
    /// base64.
    pub fn from_base64(
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, ImageReferenceError> {
        let mime_type = mime_type.into();
        let data = data.into();
        if mime_type.trim().is_empty() {
            return Err(ImageReferenceError::EmptyMimeType);
        }
        STANDARD.decode(&data)?;
        Ok(Self { mime_type, data })
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a base64 data URL with a MIME
    /// type, or the payload does not decode.
    pub fn parse_data_url(url: &str) -> Result<Self, ImageReferenceError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or(ImageReferenceError::MissingScheme)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(ImageReferenceError::MissingPayload)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(ImageReferenceError::NotBase64)?;

        Self::from_base64(mime_type, payload)
    }

    /// Declared MIME type, e.g. `image/webp`.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload without the data URL header.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Render as a data URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64. References built
    /// through this type's constructors always decode.
    pub fn decode(&self) -> Result<Vec<u8>, ImageReferenceError> {
        Ok(STANDARD.decode(&self.data)?)
    }

    /// Number of bytes the payload decodes to.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl TryFrom<String> for ImageReference {
    type Error = ImageReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_data_url(&value)
    }
}

impl From<ImageReference> for String {
    fn from(image: ImageReference) -> Self {
        image.to_data_url()
    }
}

impl std::str::FromStr for ImageReference {
    type Err = ImageReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_data_url(s)
    }
}
