//! Type conversions for PortalError

use super::types::PortalError;

impl From<image::ImageError> for PortalError {
    fn from(err: image::ImageError) -> Self {
        PortalError::Export(format!("Image processing failed: {}", err))
    }
}

impl From<qrcode::types::QrError> for PortalError {
    fn from(err: qrcode::types::QrError) -> Self {
        PortalError::Export(format!("QR code generation failed: {}", err))
    }
}

impl From<url::ParseError> for PortalError {
    fn from(err: url::ParseError) -> Self {
        PortalError::Validation(format!("Invalid URL: {}", err))
    }
}

impl From<actix_multipart::MultipartError> for PortalError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        PortalError::BadRequest(format!("Malformed upload: {}", err))
    }
}
