use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;

use futures::future::BoxFuture;
use image::DynamicImage;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use tracing::debug;

use super::assembler::{score_confidence, ProfileAssembler};
use super::errors::CoreError;
use super::models::{CandidateProfile, ExtractedText};
use super::pdf::{display_name, PageSource, PdfDocument, PdfTextExtractor};

/// Word document flattened to one text page. It has no raster form.
pub struct DocxDocument {
    name: String,
    text: String,
}

impl DocxDocument {
    pub fn from_bytes(path: &Path, data: &[u8]) -> Result<Self, CoreError> {
        let name = display_name(path);
        let text = extract_docx_text(data)
            .map_err(|err| CoreError::DocumentUnreadable(format!("{name}: {err:#}")))?;
        Ok(Self { name, text })
    }
}

impl PageSource for DocxDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        1
    }

    fn page_text(&self, _page: usize) -> &str {
        &self.text
    }

    fn render_page(&self, _page: usize, _dpi: u32) -> BoxFuture<'_, anyhow::Result<DynamicImage>> {
        Box::pin(async { Err::<DynamicImage, _>(anyhow::anyhow!("docx pages cannot be rasterized")) })
    }
}

fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let cursor = Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document_file = archive.by_name("word/document.xml")?;
    let mut xml = String::new();
    document_file.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:p" {
                    in_paragraph = true;
                    current.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"w:p" {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
            }
            // Tabs and line breaks separate words within a paragraph.
            Ok(Event::Empty(e)) => {
                if in_paragraph && matches!(e.name().as_ref(), b"w:tab" | b"w:br") {
                    current.push(' ');
                }
            }
            Ok(Event::Text(e)) => {
                if in_paragraph {
                    let value = e.xml_content()?.into_owned();
                    current.push_str(&value);
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err.into()),
            _ => {}
        }

        buf.clear();
    }

    Ok(lines.join("\n"))
}

/// Reads a CV from disk into a `PageSource`, dispatching on extension.
pub struct DocumentLoader {
    pdftoppm_path: String,
    render_timeout: Duration,
}

impl DocumentLoader {
    pub fn new(pdftoppm_path: String, render_timeout: Duration) -> Self {
        Self {
            pdftoppm_path,
            render_timeout,
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        matches!(extension_of(path).as_str(), "pdf" | "docx")
    }

    /// The file is read fully and closed before parsing starts.
    pub async fn load(&self, path: &Path) -> Result<Box<dyn PageSource>, CoreError> {
        let name = display_name(path);
        let extension = extension_of(path);
        if !Self::is_supported(path) {
            return Err(CoreError::DocumentUnreadable(format!(
                "{name}: unsupported file type"
            )));
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|err| CoreError::DocumentUnreadable(format!("{name}: {err}")))?;
        debug!(document = %name, bytes = data.len(), "document loaded");

        match extension.as_str() {
            "pdf" => Ok(Box::new(PdfDocument::from_bytes(
                path,
                data,
                self.pdftoppm_path.clone(),
                self.render_timeout,
            )?)),
            _ => Ok(Box::new(DocxDocument::from_bytes(path, &data)?)),
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub profile: CandidateProfile,
    pub ocr_used: bool,
    pub confidence: f64,
}

/// Load, extract text, assemble. Persistence is left to the caller.
pub struct CvDocumentParser {
    loader: DocumentLoader,
    text_extractor: PdfTextExtractor,
    assembler: ProfileAssembler,
}

impl CvDocumentParser {
    pub fn new(
        loader: DocumentLoader,
        text_extractor: PdfTextExtractor,
        assembler: ProfileAssembler,
    ) -> Self {
        Self {
            loader,
            text_extractor,
            assembler,
        }
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    pub async fn parse_path(&self, path: &Path) -> Result<ParsedDocument, CoreError> {
        let document = self.loader.load(path).await?;
        self.parse_document(document.as_ref()).await
    }

    pub async fn parse_document(&self, document: &dyn PageSource) -> Result<ParsedDocument, CoreError> {
        let text = self.extract_text(document).await?;
        self.assemble(&text)
    }

    pub async fn extract_text(&self, document: &dyn PageSource) -> Result<ExtractedText, CoreError> {
        self.text_extractor
            .extract_text_with_ocr_fallback(document)
            .await
    }

    pub fn assemble(&self, text: &ExtractedText) -> Result<ParsedDocument, CoreError> {
        let profile = self
            .assembler
            .assemble(text)
            .map_err(|_| CoreError::MissingIdentity)?;
        let confidence = score_confidence(&profile, text.ocr_used);

        Ok(ParsedDocument {
            profile,
            ocr_used: text.ocr_used,
            confidence,
        })
    }
}
