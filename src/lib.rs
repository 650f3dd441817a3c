//! # Image to Word
//!
//! A small web application that runs OCR over uploaded images and assembles
//! the recognized text into a single downloadable `.docx` document, one
//! section per image.

pub mod batch;
pub mod config;
pub mod document;
pub mod errors;
pub mod image_loader;
pub mod observability;
pub mod observability_config;
pub mod ocr;
pub mod ocr_config;
pub mod ocr_errors;
pub mod preprocessing;
pub mod server;

// Re-export types for easier access
pub use batch::{process_batch, BatchOutcome, ItemOutcome, ItemReport};
pub use document::{DocumentBuilder, OutputArtifact};
pub use image_loader::UploadedImage;
pub use ocr::{TesseractCli, TextRecognizer};
