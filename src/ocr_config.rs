//! # OCR Configuration Module
//!
//! This module defines the fixed engine configuration handed to Tesseract:
//! language, page segmentation mode, engine mode and the executable path.

use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

// Constants for OCR configuration
pub const DEFAULT_LANGUAGES: &str = "eng";
pub const DEFAULT_TESSERACT_CMD: &str = "/usr/bin/tesseract";
pub const FORMAT_DETECTION_BUFFER_SIZE: usize = 32;

/// Page Segmentation Mode for Tesseract OCR
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSegMode {
    /// Orientation and script detection (OSD) only
    OsdOnly = 0,
    /// Automatic page segmentation with OSD
    AutoOsd = 1,
    /// Automatic page segmentation, no OSD
    AutoNoOsd = 2,
    /// Fully automatic page segmentation
    #[default]
    Auto = 3,
    /// Assume a single column of text
    SingleColumn = 4,
    /// Assume a single uniform block of vertically aligned text
    SingleBlockVert = 5,
    /// Assume a single uniform block of text
    SingleBlock = 6,
    /// Treat the image as a single text line
    SingleLine = 7,
    /// Treat the image as a single word
    SingleWord = 8,
    /// Treat the image as a single word in a circle
    WordInCircle = 9,
    /// Treat the image as a single character
    SingleChar = 10,
    /// Find as much text as possible in no particular order
    SparseText = 11,
    /// Sparse text with OSD
    SparseTextOsd = 12,
    /// Treat the image as a single text line, bypassing hacks that are Tesseract-specific
    RawLine = 13,
}

impl PageSegMode {
    /// Convert PSM mode to string value for Tesseract
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSegMode::OsdOnly => "0",
            PageSegMode::AutoOsd => "1",
            PageSegMode::AutoNoOsd => "2",
            PageSegMode::Auto => "3",
            PageSegMode::SingleColumn => "4",
            PageSegMode::SingleBlockVert => "5",
            PageSegMode::SingleBlock => "6",
            PageSegMode::SingleLine => "7",
            PageSegMode::SingleWord => "8",
            PageSegMode::WordInCircle => "9",
            PageSegMode::SingleChar => "10",
            PageSegMode::SparseText => "11",
            PageSegMode::SparseTextOsd => "12",
            PageSegMode::RawLine => "13",
        }
    }
}

/// OCR Engine Mode for Tesseract (`--oem`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EngineMode {
    /// Legacy engine only
    LegacyOnly = 0,
    /// Neural nets LSTM engine only
    LstmOnly = 1,
    /// Legacy + LSTM engines
    LegacyLstm = 2,
    /// Whatever the installed engine offers (hybrid when both are present)
    #[default]
    Default = 3,
}

impl EngineMode {
    /// Convert OEM mode to string value for Tesseract
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::LegacyOnly => "0",
            EngineMode::LstmOnly => "1",
            EngineMode::LegacyLstm => "2",
            EngineMode::Default => "3",
        }
    }
}

/// Configuration structure for OCR processing
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the tesseract executable
    pub tesseract_cmd: PathBuf,
    /// OCR language codes (e.g., "eng", "eng+fra")
    pub languages: String,
    /// Page segmentation mode passed as `--psm`
    pub psm_mode: PageSegMode,
    /// Engine mode passed as `--oem`
    pub engine_mode: EngineMode,
    /// Bytes read from an upload for format sniffing
    pub buffer_size: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from(DEFAULT_TESSERACT_CMD),
            languages: DEFAULT_LANGUAGES.to_string(),
            psm_mode: PageSegMode::default(),
            engine_mode: EngineMode::default(),
            buffer_size: FORMAT_DETECTION_BUFFER_SIZE,
        }
    }
}

impl OcrConfig {
    /// Command-line arguments that follow `<input> stdout`
    pub fn engine_args(&self) -> Vec<String> {
        vec![
            "-l".to_string(),
            self.languages.clone(),
            "--oem".to_string(),
            self.engine_mode.as_str().to_string(),
            "--psm".to_string(),
            self.psm_mode.as_str().to_string(),
        ]
    }

    /// Validate OCR configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.languages.trim().is_empty() {
            return Err(AppError::Config("languages cannot be empty".to_string()));
        }
        if self.languages.contains(char::is_whitespace) {
            return Err(AppError::Config(format!(
                "languages must be '+'-separated codes without spaces, got '{}'",
                self.languages
            )));
        }
        if self.tesseract_cmd.as_os_str().is_empty() {
            return Err(AppError::Config(
                "tesseract_cmd cannot be empty".to_string(),
            ));
        }
        if self.buffer_size == 0 {
            return Err(AppError::Config(
                "buffer_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
