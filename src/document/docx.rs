//! WordprocessingML package writer.
//!
//! Produces the minimal set of parts Word, LibreOffice and Google Docs need
//! to open a document: content types, package and document relationships,
//! core and app properties, the main document part and a style sheet
//! defining `Normal`, `Title`, `Heading1` and `Heading2`.

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::Section;
use crate::errors::{error_logging, AppError, AppResult};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = concat!(
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
    r#"</Types>"#
);

const PACKAGE_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS: &str = concat!(
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#
);

const APP_PROPERTIES: &str = concat!(
    r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
    r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
    r#"<Application>image-to-word</Application>"#,
    r#"</Properties>"#
);

const STYLES: &str = concat!(
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:docDefaults>"#,
    r#"<w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/>"#,
    r#"<w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault>"#,
    r#"<w:pPrDefault><w:pPr><w:spacing w:after="200" w:line="276" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
    r#"</w:docDefaults>"#,
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/>"#,
    r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="300"/></w:pPr>"#,
    r#"<w:rPr><w:color w:val="17365D"/><w:sz w:val="52"/><w:szCs w:val="52"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/>"#,
    r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480" w:after="0"/>"#,
    r#"<w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="365F91"/>"#,
    r#"<w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/>"#,
    r#"<w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/>"#,
    r#"<w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="4F81BD"/>"#,
    r#"<w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style>"#,
    r#"</w:styles>"#
);

// US Letter with one-inch margins, in twentieths of a point
const SECTION_PROPERTIES: &str = concat!(
    r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
    r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/>"#,
    r#"</w:sectPr>"#
);

const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

/// Whether a character may appear in an XML 1.0 document at all.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (('\u{20}'..='\u{D7FF}').contains(&c))
        || (('\u{E000}'..='\u{FFFD}').contains(&c))
        || c >= '\u{10000}'
}

/// Escape text for element content, dropping characters XML cannot carry.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one run, turning tab characters into `<w:tab/>`.
fn run_xml(text: &str) -> String {
    let mut run = String::from("<w:r>");
    for (i, piece) in text.split('\t').enumerate() {
        if i > 0 {
            run.push_str("<w:tab/>");
        }
        if !piece.is_empty() {
            run.push_str(r#"<w:t xml:space="preserve">"#);
            run.push_str(&escape_xml(piece));
            run.push_str("</w:t>");
        }
    }
    run.push_str("</w:r>");
    run
}

fn paragraph_xml(text: &str, style: Option<&str>) -> String {
    let mut paragraph = String::from("<w:p>");
    if let Some(style) = style {
        paragraph.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, style));
    }
    paragraph.push_str(&run_xml(text));
    paragraph.push_str("</w:p>");
    paragraph
}

/// Build `word/document.xml` for the given sections.
pub fn document_xml(sections: &[Section]) -> String {
    let mut body = String::new();

    for section in sections {
        body.push_str(&paragraph_xml(&section.title, Some("Heading2")));
        for line in &section.paragraphs {
            body.push_str(&paragraph_xml(line, None));
        }
        body.push_str(PAGE_BREAK);
    }

    format!(
        r#"{XML_DECLARATION}<w:document xmlns:w="{WORDML_NS}"><w:body>{body}{SECTION_PROPERTIES}</w:body></w:document>"#
    )
}

fn core_properties_xml(created: DateTime<Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:creator>image-to-word</dc:creator>"#,
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
            r#"</cp:coreProperties>"#
        ),
        decl = XML_DECLARATION,
        stamp = stamp
    )
}

fn with_declaration(part: &str) -> String {
    format!("{XML_DECLARATION}{part}")
}

/// Write the complete `.docx` package into memory.
pub fn write_package(sections: &[Section], created: DateTime<Utc>) -> AppResult<Vec<u8>> {
    let start_time = std::time::Instant::now();

    let parts: [(&str, String); 7] = [
        ("[Content_Types].xml", with_declaration(CONTENT_TYPES)),
        ("_rels/.rels", with_declaration(PACKAGE_RELS)),
        ("docProps/core.xml", core_properties_xml(created)),
        ("docProps/app.xml", with_declaration(APP_PROPERTIES)),
        ("word/document.xml", document_xml(sections)),
        ("word/styles.xml", with_declaration(STYLES)),
        ("word/_rels/document.xml.rels", with_declaration(DOCUMENT_RELS)),
    ];

    let result = write_parts(&parts);

    match &result {
        Ok(bytes) => {
            tracing::info!(
                sections = sections.len(),
                size_bytes = bytes.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Document serialized"
            );
        }
        Err(err) => {
            error_logging::log_document_error(err, "write_package", sections.len());
        }
    }

    result
}

fn write_parts(parts: &[(&str, String)]) -> AppResult<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in parts {
        writer.start_file(*name, options)?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| AppError::Document(format!("Failed to write {name}: {e}")))?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
