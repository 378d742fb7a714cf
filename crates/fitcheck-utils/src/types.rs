//! Core domain types shared across the fitcheck crates.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media type of an image payload.
///
/// The generation core never decodes pixels; the media type is carried
/// alongside the bytes so the provider wire format and output files can
/// label the data correctly.
///
/// # Serialization
///
/// `MediaType` serializes to its MIME string (e.g. `"image/jpeg"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MediaType {
    /// JPEG image data (`image/jpeg`). The default for unlabeled uploads.
    #[default]
    #[serde(rename = "image/jpeg")]
    Jpeg,
    /// PNG image data (`image/png`).
    #[serde(rename = "image/png")]
    Png,
    /// WebP image data (`image/webp`).
    #[serde(rename = "image/webp")]
    Webp,
}

impl MediaType {
    /// Returns the MIME string for this media type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Parse a MIME string leniently.
    ///
    /// Providers are not consistent about the MIME labels they attach to
    /// generated images; anything unrecognized is treated as JPEG rather
    /// than failing the whole generation.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/webp" => Self::Webp,
            _ => Self::Jpeg,
        }
    }

    /// Parse a file extension leniently (same fallback as [`from_mime`](Self::from_mime)).
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "webp" => Self::Webp,
            _ => Self::Jpeg,
        }
    }

    /// File extension for this media type (without the leading dot).
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque binary image plus its media type.
///
/// The core treats image data as a byte blob; it is never decoded or
/// inspected beyond its length. Payloads move through the provider wire
/// format as base64, so encode/decode helpers live here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Raw image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// MIME type of `data`.
    pub media_type: MediaType,
}

impl ImagePayload {
    /// Create a payload from raw bytes.
    #[must_use]
    pub fn new(data: Vec<u8>, media_type: MediaType) -> Self {
        Self { data, media_type }
    }

    /// Decode a payload from standard base64.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error if `encoded` is not valid base64.
    pub fn from_base64(encoded: &str, media_type: MediaType) -> Result<Self, base64::DecodeError> {
        Ok(Self {
            data: BASE64.decode(encoded)?,
            media_type,
        })
    }

    /// Encode the image bytes as standard base64 for the provider wire format.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    /// Number of raw bytes in the payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload carries no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Payloads are megabytes of binary data; Debug prints a summary so tracing
// output and test failures stay readable.
impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Viewing angle of a generated try-on image.
///
/// Generation order is fixed as front → back → side ([`Angle::ALL`]); the
/// enum itself carries no other ordering guarantee.
///
/// # Serialization
///
/// Serializes to the literal labels `"front"`, `"back"`, `"side"` used in
/// result mappings and persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    /// Front-facing view. Always the designated primary.
    Front,
    /// Back view.
    Back,
    /// Side (profile) view.
    Side,
}

impl Angle {
    /// All angles in generation order.
    pub const ALL: [Angle; 3] = [Angle::Front, Angle::Back, Angle::Side];

    /// Returns the canonical lowercase label for this angle.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
        }
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Angle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            "side" => Ok(Self::Side),
            other => Err(format!(
                "Unknown angle '{other}'. Supported angles: front, back, side."
            )),
        }
    }
}

/// Where the person image in a try-on came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Uploaded with the request.
    #[default]
    Uploaded,
    /// Taken from the user's saved reference photo.
    Reference,
}

impl ImageSource {
    /// Canonical lowercase label, matching the persisted record format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Reference => "reference",
        }
    }
}

/// Caller context for a try-on request.
///
/// Replaces untyped session objects: the orchestration core only needs to
/// know whether a registered user owns the resulting record. Which images
/// the caller supplies (upload vs saved reference) is resolved upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Caller {
    /// Unauthenticated caller; resulting records have no owner.
    Anonymous,
    /// Authenticated user.
    Registered {
        /// The user's id in the identity provider.
        user_id: Uuid,
    },
}

impl Caller {
    /// Owner id for records created on behalf of this caller.
    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Anonymous => None,
            Self::Registered { user_id } => Some(*user_id),
        }
    }
}
