//! Error types for the season_colors library

use thiserror::Error;

/// Result type alias for season_colors operations
pub type Result<T> = std::result::Result<T, SeasonError>;

/// Error types raised by extraction, matching and palette loading
#[derive(Error, Debug)]
pub enum SeasonError {
    /// Pixel region too small to extract meaningful colors
    #[error("Insufficient pixel data: {pixel_count} pixels (minimum {minimum})")]
    InsufficientData { pixel_count: usize, minimum: usize },

    /// Pixel region larger than the configured upper bound
    #[error("Pixel region too large: {pixel_count} pixels (limit {limit})")]
    RegionTooLarge { pixel_count: usize, limit: usize },

    /// Matcher was given no colors
    #[error("No colors to match")]
    EmptyInput,

    /// Invalid configuration or malformed palette table
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Hex color string could not be parsed
    #[error("Invalid hex color '{value}': {reason}")]
    InvalidHex { value: String, reason: String },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoad {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem access failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SeasonError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create an invalid hex error
    pub fn invalid_hex(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidHex {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoad {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Check if this error indicates a condition the user can fix by
    /// adjusting the input image or crop
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SeasonError::InsufficientData { .. }
                | SeasonError::RegionTooLarge { .. }
                | SeasonError::EmptyInput
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            SeasonError::ImageLoad { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            SeasonError::InsufficientData { pixel_count, minimum } => format!(
                "The selected area is too small ({} pixels). Please crop a larger part of the garment (minimum {}).",
                pixel_count, minimum
            ),
            SeasonError::RegionTooLarge { .. } => {
                "The selected area is too large. Please crop tighter on the garment.".to_string()
            }
            SeasonError::EmptyInput => {
                "Couldn't compute a ranking for this image. Try cropping tighter on the garment."
                    .to_string()
            }
            _ => "Color matching failed. Please try with a different image.".to_string(),
        }
    }
}
