use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use futures::future::BoxFuture;
use image::DynamicImage;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::errors::CoreError;
use super::models::ExtractedText;
use super::ocr::OcrFallback;
use super::text_normalizer::normalize;

/// An opened document: ordered pages with text available up front and
/// raster images produced on demand.
pub trait PageSource: Send + Sync {
    fn name(&self) -> &str;

    fn page_count(&self) -> usize;

    /// Text of the zero-based `page`; empty when the page has none.
    fn page_text(&self, page: usize) -> &str;

    /// Whole-document text from a second parser, tried when every page is blank.
    fn alternate_text(&self) -> Option<String> {
        None
    }

    fn render_page(&self, page: usize, dpi: u32) -> BoxFuture<'_, anyhow::Result<DynamicImage>>;
}

pub struct PdfDocument {
    name: String,
    path: PathBuf,
    bytes: Vec<u8>,
    page_texts: Vec<String>,
    pdftoppm_path: String,
    render_timeout: Duration,
}

impl PdfDocument {
    pub fn from_bytes(
        path: &Path,
        bytes: Vec<u8>,
        pdftoppm_path: String,
        render_timeout: Duration,
    ) -> Result<Self, CoreError> {
        let name = display_name(path);
        let document = lopdf::Document::load_mem(&bytes)
            .map_err(|err| CoreError::DocumentUnreadable(format!("{name}: {err}")))?;

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(CoreError::DocumentUnreadable(format!("{name}: no pages")));
        }

        let page_texts = pages
            .keys()
            .map(|page_number| document.extract_text(&[*page_number]).unwrap_or_default())
            .collect();

        Ok(Self {
            name,
            path: path.to_path_buf(),
            bytes,
            page_texts,
            pdftoppm_path,
            render_timeout,
        })
    }

    async fn rasterize(&self, page: usize, dpi: u32) -> anyhow::Result<DynamicImage> {
        let temp_dir = tempfile::Builder::new()
            .prefix("cv-raster-")
            .tempdir()
            .context("failed to create raster temp dir")?;
        let prefix = temp_dir.path().join("page");
        let page_number = (page + 1).to_string();

        let mut command = Command::new(&self.pdftoppm_path);
        command
            .arg("-f")
            .arg(&page_number)
            .arg("-l")
            .arg(&page_number)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg("-singlefile")
            .arg(&self.path)
            .arg(&prefix)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.render_timeout, command.output()).await {
            Ok(result) => result.with_context(|| format!("failed to run {}", self.pdftoppm_path))?,
            Err(_) => anyhow::bail!("pdftoppm timed out after {:?}", self.render_timeout),
        };

        if !output.status.success() {
            anyhow::bail!(
                "pdftoppm exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let image_path = prefix.with_extension("png");
        let image = image::open(&image_path)
            .with_context(|| format!("failed to read {}", image_path.display()))?;
        Ok(image)
    }
}

impl PageSource for PdfDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.page_texts.len()
    }

    fn page_text(&self, page: usize) -> &str {
        self.page_texts.get(page).map(String::as_str).unwrap_or_default()
    }

    fn alternate_text(&self) -> Option<String> {
        let bytes = self.bytes.as_slice();
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .ok()?
            .ok()
    }

    fn render_page(&self, page: usize, dpi: u32) -> BoxFuture<'_, anyhow::Result<DynamicImage>> {
        Box::pin(self.rasterize(page, dpi))
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|v| v.to_str())
        .map(|v| v.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct PdfTextExtractor {
    ocr: Option<OcrFallback>,
    ocr_languages: Vec<String>,
}

impl PdfTextExtractor {
    pub fn new(ocr: Option<OcrFallback>, ocr_languages: Vec<String>) -> Self {
        Self { ocr, ocr_languages }
    }

    /// Direct text first; OCR runs only when every direct source is blank.
    pub async fn extract_text_with_ocr_fallback(
        &self,
        document: &dyn PageSource,
    ) -> Result<ExtractedText, CoreError> {
        let mut ocr_used = false;

        let direct = direct_text(document);
        let raw = if !direct.trim().is_empty() {
            direct
        } else if let Some(alternate) = document
            .alternate_text()
            .filter(|text| !text.trim().is_empty())
        {
            debug!(document = document.name(), "page text blank, using alternate extraction");
            alternate
        } else if let Some(ocr) = &self.ocr {
            info!(document = document.name(), pages = document.page_count(), "no text layer, running OCR");
            ocr_used = true;
            ocr.recognize(document, &self.ocr_languages).await
        } else {
            String::new()
        };

        let normalized = normalize(&raw);
        if normalized.is_empty() {
            return Err(CoreError::ExtractionEmpty(document.name().to_string()));
        }

        Ok(ExtractedText {
            raw,
            normalized,
            ocr_used,
        })
    }
}

fn direct_text(document: &dyn PageSource) -> String {
    (0..document.page_count())
        .map(|page| document.page_text(page))
        .collect::<Vec<_>>()
        .join("\n")
}
