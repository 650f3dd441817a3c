//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.

use askama::Template;
use base64::Engine as _;

use crate::batch::{ItemOutcome, ItemReport};
use crate::document::OutputArtifact;
use crate::image_loader::ACCEPTED_EXTENSIONS;

/// Value for the file input's `accept` attribute
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Upload page with nothing converted yet.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub accept: String,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            accept: accept_attribute(),
        }
    }
}

/// One uploaded file as shown on the results page.
pub struct ItemView {
    pub index: usize,
    pub filename: String,
    pub preview_uri: Option<String>,
    pub text: Option<String>,
    pub no_text: bool,
    pub error: Option<String>,
}

impl From<&ItemReport> for ItemView {
    fn from(item: &ItemReport) -> Self {
        let (text, no_text, error) = match &item.outcome {
            ItemOutcome::Text(text) => (Some(text.clone()), false, None),
            ItemOutcome::NoText => (None, true, None),
            ItemOutcome::Failed(err) => (None, false, Some(err.user_message())),
        };

        Self {
            index: item.index,
            filename: item.filename.clone(),
            preview_uri: item.preview.as_ref().map(|p| p.data_uri.clone()),
            text,
            no_text,
            error,
        }
    }
}

/// Download link carrying the whole document inline.
pub struct DownloadView {
    pub filename: &'static str,
    pub data_uri: String,
}

impl From<&OutputArtifact> for DownloadView {
    fn from(artifact: &OutputArtifact) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&artifact.bytes);
        Self {
            filename: artifact.filename,
            data_uri: format!("data:{};base64,{}", artifact.content_type, encoded),
        }
    }
}

/// Upload page after a batch has run.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub accept: String,
    pub file_count: usize,
    pub items: Vec<ItemView>,
    pub download: Option<DownloadView>,
}

impl ResultsTemplate {
    pub fn new(items: &[ItemReport], artifact: Option<&OutputArtifact>) -> Self {
        Self {
            accept: accept_attribute(),
            file_count: items.len(),
            items: items.iter().map(ItemView::from).collect(),
            download: artifact.map(DownloadView::from),
        }
    }
}
