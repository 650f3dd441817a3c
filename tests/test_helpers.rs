//! # Test Helper Library
//!
//! Common fixtures for the integration tests: synthetic images, a scripted
//! OCR engine, and helpers to look inside produced `.docx` packages.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Cursor, Read};
use std::sync::Mutex;

use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use image_to_word::ocr::{OcrError, TextRecognizer};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// White page with a few dark bars standing in for lines of text
pub fn text_like_image(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([235, 232, 225]));
    let mut y = 10;
    while y + 8 < height {
        draw_filled_rect_mut(
            &mut img,
            Rect::at(10, y as i32).of_size(width.saturating_sub(20).max(1), 6),
            Rgb([30, 30, 40]),
        );
        y += 16;
    }
    DynamicImage::ImageRgb8(img)
}

/// Uniform page with nothing on it
pub fn blank_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 255, 255])))
}

/// Encode an image in the given container format
pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("encode fixture");
    out.into_inner()
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}

/// OCR engine that replays canned responses in call order.
///
/// Once the script runs out it answers with an empty page.
pub struct ScriptedRecognizer {
    responses: Mutex<VecDeque<Result<String, OcrError>>>,
    seen: Mutex<Vec<(u32, u32)>>,
    available: bool,
}

impl ScriptedRecognizer {
    pub fn new(responses: Vec<Result<String, OcrError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
            available: true,
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    /// Dimensions of every bitmap handed to the engine, in call order
    pub fn seen(&self) -> Vec<(u32, u32)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        self.seen.lock().unwrap().push(image.dimensions());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("\x0c".to_string()))
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Read one part of a `.docx` package as text
pub fn docx_part(docx: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("valid zip");
    let mut part = archive.by_name(name).expect("part present");
    let mut content = String::new();
    part.read_to_string(&mut content).expect("utf-8 part");
    content
}

/// Names of every part in a `.docx` package
pub fn docx_part_names(docx: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(docx)).expect("valid zip");
    archive.file_names().map(str::to_string).collect()
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn strip_tags(xml: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for c in xml.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

/// Flatten `word/document.xml` into one entry per paragraph.
///
/// Level-2 headings come out as `"## title"`, page breaks as `"<page>"`.
pub fn document_outline(docx: &[u8]) -> Vec<String> {
    let xml = docx_part(docx, "word/document.xml");
    let body = xml
        .split("<w:body>")
        .nth(1)
        .expect("document body")
        .to_string();

    body.split("<w:p>")
        .skip(1)
        .map(|chunk| {
            let paragraph = chunk.split("</w:p>").next().unwrap_or_default();
            if paragraph.contains(r#"<w:br w:type="page"/>"#) {
                return "<page>".to_string();
            }
            let text = unescape(&strip_tags(&paragraph.replace("<w:tab/>", "\t")));
            if paragraph.contains(r#"<w:pStyle w:val="Heading2"/>"#) {
                format!("## {text}")
            } else {
                text
            }
        })
        .collect()
}

/// Headings of every section, in document order
pub fn section_titles(docx: &[u8]) -> Vec<String> {
    document_outline(docx)
        .into_iter()
        .filter_map(|p| p.strip_prefix("## ").map(str::to_string))
        .collect()
}
