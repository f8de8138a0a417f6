// Face-recognition test endpoints. Matching happens server-side; the
// client only ships a base64-encoded image.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{FaceImage, FaceMatchDto};

impl FaceImage {
    /// Encode raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            image: STANDARD.encode(bytes),
        }
    }

    /// Read and encode an image file.
    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(&bytes))
    }
}

impl Client {
    /// `POST /face-recognition/recognize`
    pub async fn recognize_face(&self, image: &FaceImage) -> Result<FaceMatchDto, Error> {
        debug!(bytes = image.image.len(), "uploading face image for recognition");
        let url = self.endpoint(&["face-recognition", "recognize"])?;
        self.post(url, image).await
    }

    /// Enroll a face for a user.
    ///
    /// `POST /face-recognition/register/:userId`
    pub async fn register_face(&self, user_id: &str, image: &FaceImage) -> Result<FaceMatchDto, Error> {
        debug!(user_id, "enrolling face image");
        let url = self.endpoint(&["face-recognition", "register", user_id])?;
        self.post(url, image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_data_url_prefix() {
        let img = FaceImage::from_bytes(b"\x89PNG");
        assert_eq!(img.image, "iVBORw==");
    }
}
