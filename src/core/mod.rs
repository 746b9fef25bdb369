pub mod assembler;
pub mod document_parser;
pub mod errors;
pub mod field_extractor;
pub mod models;
pub mod ner;
pub mod ocr;
pub mod pdf;
pub mod profile_store;
pub mod runtime;
pub mod service;
pub mod settings_store;
pub mod text_normalizer;
pub mod upserter;
