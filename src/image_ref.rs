use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageRefError {
    #[error("result is not an embedded image and cannot be saved without fetching it: {0}")]
    NotEmbedded(String),
    #[error("malformed data URI: missing ',' separator")]
    MalformedDataUri,
    #[error("percent-encoded data URI payloads are not supported")]
    PercentEncoded,
    #[error("data URI payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("error while writing image: {0}")]
    IOError(#[from] std::io::Error),
}

/// The string the backend returned for a generated image. It is used as-is
/// both for display and as the download source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    Embedded {
        media_type: &'a str,
        base64: bool,
        payload: &'a str,
    },
    Remote(&'a str),
}

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn source(&self) -> Result<ImageSource<'_>, ImageRefError> {
        let Some(rest) = self.0.strip_prefix("data:") else {
            return Ok(ImageSource::Remote(&self.0));
        };

        let (meta, payload) = rest
            .split_once(',')
            .ok_or(ImageRefError::MalformedDataUri)?;
        let (media_type, base64) = match meta.strip_suffix(";base64") {
            Some(media_type) => (media_type, true),
            None => (meta, false),
        };

        Ok(ImageSource::Embedded {
            media_type,
            base64,
            payload,
        })
    }

    /// The bytes a download of this reference produces. Only embedded
    /// references can be materialized locally.
    pub fn bytes(&self) -> Result<Vec<u8>, ImageRefError> {
        match self.source()? {
            ImageSource::Embedded {
                base64: true,
                payload,
                ..
            } => Ok(STANDARD.decode(payload.trim())?),
            ImageSource::Embedded { payload, .. } if payload.contains('%') => {
                Err(ImageRefError::PercentEncoded)
            }
            // without escapes the payload already is the downloaded content
            ImageSource::Embedded { payload, .. } => Ok(payload.as_bytes().to_vec()),
            ImageSource::Remote(url) => Err(ImageRefError::NotEmbedded(url.to_string())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<usize, ImageRefError> {
        let bytes = self.bytes()?;
        std::fs::write(path, &bytes)?;
        tracing::info!(path = %path.display(), len = bytes.len(), "saved generated image");
        Ok(bytes.len())
    }
}
