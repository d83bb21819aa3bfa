//! Interaction extraction from lookup pages.
//!
//! ### Algorithm
//! 1. Decode the body as UTF-8 and parse it. Undecodable bodies are a `ParseError`.
//! 2. First element matching the section marker, else `NoSection`.
//! 3. All entry markers inside the section, in document order, else `NoEntries`.
//! 4. Per entry: first title, first detail and optional first severity.
//!    Entries whose title or detail is missing or blank are skipped with a warning.
//! 5. Records are keyed by title; a later duplicate title replaces the earlier record.
//!
//! ### Stable Abstraction
//! - Uses the `Extractor` trait so the batch runner does not depend on scraper.

use ddicheck_core::{
    DrugLookupResult, Error, Extraction, FailureReason, InteractionRecord, InteractionSet, Markers,
};
use scraper::{ElementRef, Html, Selector};

/// Stable extractor trait for interaction extraction.
pub trait Extractor: Send + Sync {
    /// Extract interaction records from a raw document body.
    fn extract(&self, body: &[u8]) -> Extraction;
}

/// Marker-selector based extractor using scraper.
#[derive(Debug, Clone)]
pub struct InteractionExtractor {
    section: Selector,
    entry: Selector,
    title: Selector,
    detail: Selector,
    severity: Selector,
}

fn compile(selector: &str) -> Result<Selector, Error> {
    Selector::parse(selector)
        .map_err(|e| Error::InvalidSelector { selector: selector.to_string(), reason: e.to_string() })
}

impl InteractionExtractor {
    /// Compile the marker selectors.
    pub fn new(markers: &Markers) -> Result<Self, Error> {
        Ok(Self {
            section: compile(&markers.section)?,
            entry: compile(&markers.entry)?,
            title: compile(&markers.title)?,
            detail: compile(&markers.detail)?,
            severity: compile(&markers.severity)?,
        })
    }

    /// Extract interaction records from an HTML string.
    pub fn extract_html(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            tracing::debug!("recovered from {} markup errors", document.errors.len());
        }

        let Some(section) = document.select(&self.section).next() else {
            return Extraction::failed(FailureReason::NoSection);
        };

        let entries: Vec<ElementRef<'_>> = section.select(&self.entry).collect();
        if entries.is_empty() {
            return Extraction::failed(FailureReason::NoEntries);
        }

        let mut records = InteractionSet::new();
        let mut warnings = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let title = first_text(entry, &self.title);
            let detail = first_text(entry, &self.detail);

            match (title, detail) {
                (Some(title), Some(detail)) => {
                    let severity = first_text(entry, &self.severity);
                    let record = InteractionRecord::new(&title, &detail, severity.as_deref());
                    if records.insert(record).is_some() {
                        tracing::debug!("duplicate interaction title {:?}, keeping the later entry", title);
                    }
                }
                _ => {
                    let warning =
                        format!("Interaction entry {}: title or details not found; entry skipped.", index + 1);
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Extraction { result: DrugLookupResult::Interactions(records), warnings }
    }
}

impl Extractor for InteractionExtractor {
    fn extract(&self, body: &[u8]) -> Extraction {
        match std::str::from_utf8(body) {
            Ok(html) => self.extract_html(html),
            Err(e) => Extraction::failed(FailureReason::ParseError(format!("document body is not valid UTF-8: {}", e))),
        }
    }
}

/// Trimmed text of the first descendant matching `selector`, if not blank.
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}
