//! Image sizes and proxied image payloads.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::{ALLOWED_IMAGE_SIZES, DEFAULT_IMAGE_SIZE};

/// A size from the client-facing allow-list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize(u32);

impl ImageSize {
    /// Validates a size against [`ALLOWED_IMAGE_SIZES`].
    pub fn new(size: u32) -> Option<Self> {
        ALLOWED_IMAGE_SIZES.contains(&size).then_some(Self(size))
    }

    /// Parses a client-supplied size, falling back to the default on anything
    /// missing, non-numeric, or outside the allow-list.
    ///
    /// Leading digits are honoured (`"1024px"` reads as 1024).
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(leading_number)
            .and_then(Self::new)
            .unwrap_or_default()
    }

    /// Maps the named avatar routes onto their fixed sizes.
    pub fn from_variant(name: &str) -> Option<Self> {
        let size = match name {
            "image" => 512,
            "smallimage" => 128,
            "bigimage" => 1024,
            "superbigimage" => 4096,
            _ => return None,
        };
        Some(Self(size))
    }

    /// Interprets the last segment of `/api/pfp/:userId/:segment`: a named
    /// variant if it is one, otherwise a numeric size with fallback.
    pub fn from_route_segment(segment: &str) -> Self {
        Self::from_variant(segment).unwrap_or_else(|| Self::from_param(Some(segment)))
    }

    /// Pixel size.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self(DEFAULT_IMAGE_SIZE)
    }
}

fn leading_number(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(idx, _)| idx);
    raw[..end].parse().ok()
}

/// Image bytes fetched from a CDN, ready to be relayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxiedImage {
    /// `Content-Type` reported by the CDN.
    pub content_type: Option<String>,
    /// Raw image body.
    pub body: Bytes,
}
