use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use futures::future::BoxFuture;
use image::{DynamicImage, GrayImage, Luma};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::pdf::PageSource;

/// Turns one enhanced page image into text.
pub trait PageRecognizer: Send + Sync {
    fn recognize_page<'a>(
        &'a self,
        image: &'a GrayImage,
        languages: &'a [String],
    ) -> BoxFuture<'a, anyhow::Result<String>>;
}

#[derive(Clone)]
pub struct TesseractCliOcrService {
    pub tesseract_executable_path: String,
    pub char_whitelist: String,
    pub timeout: Duration,
}

impl TesseractCliOcrService {
    pub fn new(tesseract_executable_path: String, char_whitelist: String, timeout: Duration) -> Self {
        Self {
            tesseract_executable_path,
            char_whitelist,
            timeout,
        }
    }

    /// Languages reported by `tesseract --list-langs`.
    pub async fn installed_languages(&self) -> anyhow::Result<Vec<String>> {
        let output = Command::new(&self.tesseract_executable_path)
            .arg("--list-langs")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.tesseract_executable_path))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} --list-langs exited with {}",
                self.tesseract_executable_path,
                output.status
            );
        }

        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn run(&self, image: &GrayImage, languages: &[String]) -> anyhow::Result<String> {
        let temp_dir = tempfile::Builder::new()
            .prefix("cv-ocr-")
            .tempdir()
            .context("failed to create OCR temp dir")?;

        let input_path: PathBuf = temp_dir.path().join("page.png");
        image
            .save(&input_path)
            .context("failed to write page image")?;

        let mut command = Command::new(&self.tesseract_executable_path);
        command
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(languages.join("+"))
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("6");
        if !self.char_whitelist.is_empty() {
            command
                .arg("-c")
                .arg(format!("tessedit_char_whitelist={}", self.char_whitelist));
        }
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(result) => result?,
            Err(_) => anyhow::bail!("tesseract timed out after {:?}", self.timeout),
        };

        if !output.status.success() {
            anyhow::bail!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl PageRecognizer for TesseractCliOcrService {
    fn recognize_page<'a>(
        &'a self,
        image: &'a GrayImage,
        languages: &'a [String],
    ) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(self.run(image, languages))
    }
}

fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of"))
        .map(|line| line.to_string())
        .collect()
}

/// Greyscale conversion followed by contrast then sharpness boosts.
///
/// Factors follow the usual enhancement convention: `1.0` leaves the image
/// unchanged, larger values push pixels away from the degenerate image
/// (mean grey for contrast, a smoothed copy for sharpness).
#[derive(Debug, Clone, Copy)]
pub struct ImageEnhancement {
    pub contrast: f32,
    pub sharpness: f32,
}

impl ImageEnhancement {
    pub fn apply(&self, image: &DynamicImage) -> GrayImage {
        let grey = image.to_luma8();
        let contrasted = adjust_contrast(&grey, self.contrast);
        adjust_sharpness(&contrasted, self.sharpness)
    }
}

pub fn adjust_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count == 0 {
        return image.clone();
    }

    let total: u64 = image.pixels().map(|p| u64::from(p.0[0])).sum();
    let mean = (total as f32 / pixel_count as f32).round();

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let value = mean + factor * (f32::from(pixel.0[0]) - mean);
        *pixel = Luma([clamp_channel(value)]);
    }
    out
}

pub fn adjust_sharpness(image: &GrayImage, factor: f32) -> GrayImage {
    const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];

    if image.width() < 3 || image.height() < 3 {
        return image.clone();
    }

    let smoothed: GrayImage = image::imageops::filter3x3(image, &SMOOTH_KERNEL);
    let mut out = image.clone();
    let (width, height) = image.dimensions();
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let original = f32::from(image.get_pixel(x, y).0[0]);
            let soft = f32::from(smoothed.get_pixel(x, y).0[0]);
            out.put_pixel(x, y, Luma([clamp_channel(soft + factor * (original - soft))]));
        }
    }
    out
}

fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Page-by-page OCR over a document whose direct text came back blank.
pub struct OcrFallback {
    recognizer: std::sync::Arc<dyn PageRecognizer>,
    dpi: u32,
    enhancement: ImageEnhancement,
}

impl OcrFallback {
    pub fn new(
        recognizer: std::sync::Arc<dyn PageRecognizer>,
        dpi: u32,
        enhancement: ImageEnhancement,
    ) -> Self {
        Self {
            recognizer,
            dpi,
            enhancement,
        }
    }

    /// Failed pages contribute an empty string; the result is empty only when every page failed.
    pub async fn recognize(&self, document: &dyn PageSource, languages: &[String]) -> String {
        let mut pages = Vec::with_capacity(document.page_count());

        for page in 0..document.page_count() {
            let image = match document.render_page(page, self.dpi).await {
                Ok(image) => image,
                Err(err) => {
                    warn!(document = document.name(), page = page + 1, "rasterization failed: {err:#}");
                    pages.push(String::new());
                    continue;
                }
            };

            let enhanced = self.enhancement.apply(&image);
            match self.recognizer.recognize_page(&enhanced, languages).await {
                Ok(text) => {
                    debug!(document = document.name(), page = page + 1, chars = text.len(), "page recognized");
                    pages.push(text);
                }
                Err(err) => {
                    warn!(document = document.name(), page = page + 1, "OCR failed: {err:#}");
                    pages.push(String::new());
                }
            }
        }

        pages.join("\n")
    }
}
