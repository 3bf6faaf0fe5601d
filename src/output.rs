//! The uniform result record produced by every extraction.
//!
//! An [`ExtractionResult`] is built once per request and never mutated after
//! it is returned. The constructors here are the only way the crate creates
//! one, which keeps the record's invariants in a single place:
//!
//! * `total_chars == text.chars().count()`
//! * `success` iff `text.trim()` is non-empty
//! * `method == Method::None` implies `success == false`

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tier produced the returned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// PDFium text layer.
    Primary,
    /// pdf-extract content-stream reader.
    Secondary,
    /// Text layer injected by OCR.
    Ocr,
    /// No tier produced text.
    None,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Primary => "primary",
            Method::Secondary => "secondary",
            Method::Ocr => "ocr",
            Method::None => "none",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ExtractError;

    /// Parse a tier name. Engine names are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" | "pdfium" => Ok(Method::Primary),
            "secondary" | "pdf-extract" | "pdf_extract" => Ok(Method::Secondary),
            "ocr" | "ocrmypdf" => Ok(Method::Ocr),
            other => Err(ExtractError::UnknownTier {
                name: other.to_string(),
                available: "primary, secondary, ocr".to_string(),
            }),
        }
    }
}

/// Text of a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Normalised page text; empty when the page carried no text.
    pub text: String,
    /// `text.chars().count()`.
    pub char_count: usize,
}

impl PageText {
    pub fn new(page_num: usize, text: String) -> Self {
        let char_count = text.chars().count();
        Self {
            page_num,
            text,
            char_count,
        }
    }
}

/// Outcome of one extraction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub method: Method,
    pub text: String,
    pub num_pages: usize,
    pub total_chars: usize,
    pub pages: Vec<PageText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Message used whenever a run ends without text.
pub const NO_TEXT_MESSAGE: &str = "no extractable text";

impl ExtractionResult {
    /// Assemble a result from the page strings one tier produced.
    ///
    /// Pages are joined with a single `\n`. Whether the result counts as a
    /// success is decided purely by the joined text.
    pub fn from_pages(method: Method, pages: Vec<String>) -> Self {
        let pages: Vec<PageText> = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageText::new(i + 1, text))
            .collect();
        let text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let success = !text.trim().is_empty();

        Self {
            success,
            method,
            total_chars: text.chars().count(),
            num_pages: pages.len(),
            text,
            pages,
            error: if success {
                None
            } else {
                Some(NO_TEXT_MESSAGE.to_string())
            },
        }
    }

    /// Every tier ran and none produced text.
    ///
    /// `num_pages` is the last page count any tier observed; `last_error` is
    /// the failure of the last tier attempted, if it failed rather than
    /// returning empty text.
    pub fn exhausted(num_pages: usize, last_error: Option<&str>) -> Self {
        let error = match last_error {
            Some(e) => format!("{NO_TEXT_MESSAGE}: {e}"),
            None => NO_TEXT_MESSAGE.to_string(),
        };
        Self {
            success: false,
            method: Method::None,
            text: String::new(),
            num_pages,
            total_chars: 0,
            pages: Vec::new(),
            error: Some(error),
        }
    }

    /// A single-tier run whose tier failed outright.
    pub fn tier_failed(method: Method, error: impl Into<String>) -> Self {
        Self {
            success: false,
            method,
            text: String::new(),
            num_pages: 0,
            total_chars: 0,
            pages: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Convert a logical failure into an error, for callers who want to
    /// treat "no text" like any other failure.
    pub fn into_result(self) -> Result<Self, ExtractError> {
        if self.success {
            Ok(self)
        } else {
            Err(ExtractError::NoText {
                num_pages: self.num_pages,
                detail: self
                    .error
                    .unwrap_or_else(|| NO_TEXT_MESSAGE.to_string()),
            })
        }
    }

    /// The two-field record the command-line adapter prints by default.
    pub fn compact(&self) -> CompactOutput {
        CompactOutput {
            text: self.text.clone(),
            num_pages: self.num_pages,
            error: None,
        }
    }
}

/// `{"text": .., "numPages": ..}` as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactOutput {
    pub text: String,
    pub num_pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompactOutput {
    /// Structured output for an input that could not be resolved.
    pub fn input_error(err: &ExtractError) -> Self {
        Self {
            text: String::new(),
            num_pages: 0,
            error: Some(err.to_string()),
        }
    }
}
