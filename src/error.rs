use thiserror::Error;

/// Errors raised while interpreting user-selected stroke styles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    #[error("Invalid color '{0}': expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}

/// Errors that can occur while placing an external image onto the surface
#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Surface is not ready")]
    SurfaceNotReady,
}

/// Errors surfaced to the user when a generation request cannot be completed
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Please write a prompt to describe your drawing.")]
    EmptyPrompt,
    #[error("API key is not configured. Set GEMINI_API_KEY or API_KEY.")]
    MissingApiKey,
    #[error("Surface is not ready yet")]
    SurfaceNotReady,
    #[error("Failed to encode drawing: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Gemini API Error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API Error: {0}")]
    Service(String),
    #[error("Failed to generate image. The model did not return an image.")]
    NoImage,
    #[error("Generation request was cancelled")]
    Cancelled,
}
