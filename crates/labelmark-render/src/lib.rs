#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod font;
pub mod number;
pub mod spans;
pub mod text;

pub use config::LabelConfig;
pub use engine::LabelEngine;
pub use number::format_number;
pub use spans::{SpanOptions, serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] labelmark_core::Error),
    #[error(transparent)]
    Font(#[from] font::FontError),
    #[error(transparent)]
    Measure(#[from] text::MeasureError),
    #[error("invalid label config: {message}")]
    InvalidConfig { message: String },
    #[error("label config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
