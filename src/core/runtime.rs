use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::assembler::ProfileAssembler;
use super::document_parser::{CvDocumentParser, DocumentLoader};
use super::errors::CoreError;
use super::field_extractor::FieldExtractors;
use super::models::RuntimeSettings;
use super::ner::{EntityRecognizer, GazetteerRecognizer};
use super::ocr::{ImageEnhancement, OcrFallback, PageRecognizer, TesseractCliOcrService};
use super::pdf::PdfTextExtractor;

/// Process-wide extraction state, set up once before the first document and
/// released after the last.
pub struct ExtractionRuntime {
    settings: RuntimeSettings,
    page_recognizer: Option<Arc<dyn PageRecognizer>>,
    entity_recognizer: Arc<dyn EntityRecognizer>,
}

impl ExtractionRuntime {
    /// Verifies the OCR engine and its languages when OCR is enabled.
    pub async fn initialize(settings: RuntimeSettings) -> Result<Self, CoreError> {
        let settings = settings.sanitized();

        let page_recognizer: Option<Arc<dyn PageRecognizer>> = if settings.ocr_enabled {
            let tesseract = TesseractCliOcrService::new(
                settings.tesseract_path.clone(),
                settings.ocr_char_whitelist.clone(),
                Duration::from_secs(settings.ocr_page_timeout_seconds),
            );

            let installed = tesseract.installed_languages().await.map_err(|err| {
                CoreError::Configuration(format!(
                    "tesseract at {:?} is not usable: {err:#}",
                    settings.tesseract_path
                ))
            })?;

            let missing: Vec<&str> = settings
                .ocr_languages
                .iter()
                .filter(|lang| !installed.iter().any(|i| i == *lang))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(CoreError::Configuration(format!(
                    "tesseract language data missing: {}",
                    missing.join(", ")
                )));
            }

            info!(
                tesseract = %settings.tesseract_path,
                languages = %settings.ocr_languages.join("+"),
                "OCR engine ready"
            );
            Some(Arc::new(tesseract))
        } else {
            info!("OCR disabled");
            None
        };

        let entity_recognizer: Arc<dyn EntityRecognizer> = Arc::new(GazetteerRecognizer::new(
            &settings.given_name_lexicon,
            &settings.title_words,
        ));

        Ok(Self {
            settings,
            page_recognizer,
            entity_recognizer,
        })
    }

    /// Skips engine discovery; used with injected recognizers.
    pub fn with_components(
        settings: RuntimeSettings,
        page_recognizer: Option<Arc<dyn PageRecognizer>>,
        entity_recognizer: Arc<dyn EntityRecognizer>,
    ) -> Self {
        Self {
            settings: settings.sanitized(),
            page_recognizer,
            entity_recognizer,
        }
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn ocr_available(&self) -> bool {
        self.page_recognizer.is_some()
    }

    pub fn build_parser(&self) -> Result<CvDocumentParser, CoreError> {
        let settings = &self.settings;
        let extractors =
            FieldExtractors::from_settings(settings, Arc::clone(&self.entity_recognizer))?;

        let ocr = self.page_recognizer.as_ref().map(|recognizer| {
            OcrFallback::new(
                Arc::clone(recognizer),
                settings.ocr_dpi,
                ImageEnhancement {
                    contrast: settings.contrast_factor,
                    sharpness: settings.sharpness_factor,
                },
            )
        });

        Ok(CvDocumentParser::new(
            DocumentLoader::new(
                settings.pdftoppm_path.clone(),
                Duration::from_secs(settings.ocr_page_timeout_seconds),
            ),
            PdfTextExtractor::new(ocr, settings.ocr_languages.clone()),
            ProfileAssembler::new(extractors),
        ))
    }

    pub fn shutdown(self) {
        info!(ocr = self.ocr_available(), "extraction runtime released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_tesseract_binary_is_configuration_error() {
        let settings = RuntimeSettings {
            tesseract_path: "/nonexistent/bin/tesseract-cv-test".to_string(),
            ..RuntimeSettings::default()
        };
        let result = ExtractionRuntime::initialize(settings).await;
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[tokio::test]
    async fn disabled_ocr_skips_engine_check() {
        let settings = RuntimeSettings {
            tesseract_path: "/nonexistent/bin/tesseract-cv-test".to_string(),
            ocr_enabled: false,
            ..RuntimeSettings::default()
        };
        let runtime = ExtractionRuntime::initialize(settings).await.unwrap();
        assert!(!runtime.ocr_available());
        assert!(runtime.build_parser().is_ok());
        runtime.shutdown();
    }

    #[test]
    fn invalid_phone_pattern_fails_parser_build() {
        let settings = RuntimeSettings {
            ocr_enabled: false,
            phone_patterns: vec!["[0-9".to_string()],
            ..RuntimeSettings::default()
        };
        let recognizer = Arc::new(GazetteerRecognizer::new(
            &settings.given_name_lexicon,
            &settings.title_words,
        ));
        let runtime = ExtractionRuntime::with_components(settings, None, recognizer);
        assert!(matches!(
            runtime.build_parser(),
            Err(CoreError::Configuration(_))
        ));
    }
}
