//! Batch lookups over a drug list.
//!
//! Looks up every drug with bounded concurrency and assembles the results in
//! input order.

use ddicheck_core::{AppConfig, DrugLookupResult, Error, FailureReason, LookupBatch, parse_drug_list};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

use crate::extract::{Extractor, InteractionExtractor};
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher};

/// Runs fetch and extraction for each drug of a check.
#[derive(Clone)]
pub struct Checker {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    max_concurrency: usize,
}

impl Checker {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn Extractor>, max_concurrency: usize) -> Self {
        Self { fetcher, extractor, max_concurrency: max_concurrency.max(1) }
    }

    /// Build the HTTP fetcher and marker extractor described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = HttpFetcher::new(FetchConfig::from(config))?;
        let extractor = InteractionExtractor::new(&config.markers)?;
        Ok(Self::new(Arc::new(fetcher), Arc::new(extractor), config.max_concurrency))
    }

    /// Look up a single drug.
    ///
    /// A transport failure short-circuits; the extractor only sees 200 responses.
    pub async fn lookup(&self, drug: &str) -> (DrugLookupResult, Vec<String>) {
        lookup(self.fetcher.as_ref(), self.extractor.as_ref(), drug).await
    }

    /// Parse comma-separated input and look up every distinct drug.
    pub async fn check(&self, input: &str) -> LookupBatch {
        self.check_drugs(parse_drug_list(input)).await
    }

    /// Look up each drug and collect the results in the given order.
    ///
    /// A lookup task that panics is recorded as `Unexpected` for its drug only.
    pub async fn check_drugs(&self, drugs: Vec<String>) -> LookupBatch {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(drugs.len());

        for drug in drugs {
            // Taken before spawning so lookups start in input order.
            let permit = semaphore.clone().acquire_owned().await.ok();
            let fetcher = self.fetcher.clone();
            let extractor = self.extractor.clone();
            let task_drug = drug.clone();

            let handle = tokio::spawn(async move {
                // NOTE: Hold permit for task duration to enforce concurrency limit
                let _permit = permit;
                lookup(fetcher.as_ref(), extractor.as_ref(), &task_drug).await
            });
            handles.push((drug, handle));
        }

        let mut batch = LookupBatch::new();
        for (drug, handle) in handles {
            let (result, warnings) = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = panic_message(e);
                    tracing::error!("lookup for {} failed unexpectedly: {}", drug, message);
                    (DrugLookupResult::Failure(FailureReason::Unexpected(message)), Vec::new())
                }
            };
            batch.insert(drug, result, warnings);
        }

        tracing::info!(
            drugs = batch.len(),
            interactions = batch.interaction_count(),
            "check completed"
        );

        batch
    }
}

async fn lookup(fetcher: &dyn Fetcher, extractor: &dyn Extractor, drug: &str) -> (DrugLookupResult, Vec<String>) {
    let body = match fetcher.fetch(drug).await {
        Ok(body) => body,
        Err(failure) => {
            tracing::debug!("lookup for {} failed: {}", drug, failure);
            return (failure.into(), Vec::new());
        }
    };

    let extraction = extractor.extract(&body.bytes);
    (extraction.result, extraction.warnings)
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "lookup task panicked".to_string()
    }
}

/// Holds the batch produced by the most recent check.
///
/// Each check replaces the previous batch and a reset drops it.
pub struct Session {
    checker: Checker,
    current: Option<LookupBatch>,
}

impl Session {
    pub fn new(checker: Checker) -> Self {
        Self { checker, current: None }
    }

    /// Run a check on raw comma-separated input, replacing any previous batch.
    pub async fn run_check(&mut self, input: &str) -> &LookupBatch {
        let batch = self.checker.check(input).await;
        self.current.insert(batch)
    }

    /// Discard the current batch.
    pub fn reset(&mut self) {
        if self.current.take().is_some() {
            tracing::debug!("session reset, previous batch discarded");
        }
    }

    pub fn current(&self) -> Option<&LookupBatch> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::DocumentBody;
    use async_trait::async_trait;
    use bytes::Bytes;
    use ddicheck_core::{Extraction, Markers, TransportFailure};
    use reqwest::Url;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    fn page(entries: &[(&str, &str)]) -> String {
        let items: String = entries
            .iter()
            .map(|(title, detail)| format!(r#"<div class="interaction-list"><h4>{title}</h4><p>{detail}</p></div>"#))
            .collect();
        format!(r#"<html><body><div class="page-section-interactions">{items}</div></body></html>"#)
    }

    /// In-memory fetcher: a page per drug, a status failure otherwise.
    #[derive(Default)]
    struct StaticFetcher {
        pages: HashMap<String, String>,
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn with_page(mut self, drug: &str, html: String) -> Self {
            self.pages.insert(drug.to_string(), html);
            self
        }

        fn with_delay(mut self, drug: &str, delay: Duration) -> Self {
            self.delays.insert(drug.to_string(), delay);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, drug: &str) -> Result<DocumentBody, TransportFailure> {
            self.calls.lock().unwrap().push(drug.to_string());
            if let Some(delay) = self.delays.get(drug) {
                tokio::time::sleep(*delay).await;
            }

            let html = self.pages.get(drug).ok_or(TransportFailure::Status { code: 404 })?;
            let url = Url::parse("https://example.com/lookup").unwrap();
            Ok(DocumentBody {
                url: url.clone(),
                final_url: url,
                content_type: Some("text/html".into()),
                bytes: Bytes::from(html.clone()),
                fetch_ms: 0,
            })
        }
    }

    /// Extractor that panics for bodies containing a marker string.
    struct PanickyExtractor(InteractionExtractor);

    impl Extractor for PanickyExtractor {
        fn extract(&self, body: &[u8]) -> Extraction {
            if body.windows(5).any(|w| w == b"PANIC") {
                panic!("extractor exploded");
            }
            self.0.extract(body)
        }
    }

    fn extractor() -> InteractionExtractor {
        InteractionExtractor::new(&Markers::default()).unwrap()
    }

    fn checker(fetcher: StaticFetcher, max_concurrency: usize) -> (Checker, Arc<StaticFetcher>) {
        let fetcher = Arc::new(fetcher);
        (Checker::new(fetcher.clone(), Arc::new(extractor()), max_concurrency), fetcher)
    }

    #[tokio::test]
    async fn test_check_one_entry_per_distinct_token_in_order() {
        let fetcher = StaticFetcher::default()
            .with_page("warfarin", page(&[("Warfarin + Aspirin", "bleeding")]))
            .with_page("aspirin", page(&[("Aspirin + Ibuprofen", "reduced effect")]));
        let (checker, fetcher) = checker(fetcher, 4);

        let batch = checker.check(" warfarin, ,aspirin,warfarin ,, metformin").await;

        let drugs: Vec<&str> = batch.drugs().collect();
        assert_eq!(drugs, vec!["warfarin", "aspirin", "metformin"]);
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_check_empty_input_fetches_nothing() {
        let (checker, fetcher) = checker(StaticFetcher::default(), 4);
        let batch = checker.check(" , ,").await;
        assert!(batch.is_empty());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_transport_failure_does_not_abort_batch() {
        let fetcher = StaticFetcher::default().with_page("aspirin", page(&[("A", "detail")]));
        let (checker, _) = checker(fetcher, 1);

        let batch = checker.check("unknown-drug, aspirin").await;

        assert_eq!(
            batch.get("unknown-drug").unwrap().result,
            DrugLookupResult::Failure(FailureReason::TransportError(TransportFailure::Status { code: 404 }))
        );
        assert_eq!(batch.get("aspirin").unwrap().result.interactions().map(|s| s.len()), Some(1));
    }

    #[tokio::test]
    async fn test_check_order_is_input_order_not_completion_order() {
        let fetcher = StaticFetcher::default()
            .with_page("slow", page(&[("S", "slow detail")]))
            .with_page("fast", page(&[("F", "fast detail")]))
            .with_delay("slow", Duration::from_millis(100));
        let (checker, _) = checker(fetcher, 4);

        let batch = checker.check("slow, fast").await;

        let drugs: Vec<&str> = batch.drugs().collect();
        assert_eq!(drugs, vec!["slow", "fast"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_check_sequential_when_concurrency_is_one() {
        let drugs: Vec<String> = (0..20).map(|i| format!("d{i}")).collect();
        let fetcher = drugs
            .iter()
            .fold(StaticFetcher::default(), |f, d| f.with_page(d, page(&[("T", "t")])))
            .with_delay("d0", Duration::from_millis(30));
        let (checker, fetcher) = checker(fetcher, 1);

        for _ in 0..10 {
            fetcher.calls.lock().unwrap().clear();
            let batch = checker.check_drugs(drugs.clone()).await;

            assert_eq!(fetcher.calls(), drugs);
            assert_eq!(batch.drugs().collect::<Vec<_>>(), drugs.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_check_bounded_concurrency_keeps_input_order() {
        let drugs: Vec<String> = (0..20).map(|i| format!("d{i}")).collect();
        let fetcher = drugs
            .iter()
            .enumerate()
            .fold(StaticFetcher::default(), |f, (i, d)| {
                f.with_page(d, page(&[("T", "t")])).with_delay(d, Duration::from_millis(((20 - i) % 7) as u64 * 5))
            });
        let (checker, fetcher) = checker(fetcher, 3);

        let batch = checker.check_drugs(drugs.clone()).await;

        assert_eq!(batch.drugs().collect::<Vec<_>>(), drugs.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(fetcher.calls().len(), 20);
    }

    #[tokio::test]
    async fn test_check_carries_extraction_warnings() {
        let html = r#"<div class="page-section-interactions">
            <div class="interaction-list"><p>no title</p></div>
            <div class="interaction-list"><h4>T</h4><p>d</p></div>
        </div>"#;
        let fetcher = StaticFetcher::default().with_page("warfarin", html.to_string());
        let (checker, _) = checker(fetcher, 4);

        let batch = checker.check("warfarin").await;
        let entry = batch.get("warfarin").unwrap();

        assert_eq!(entry.warnings.len(), 1);
        assert_eq!(entry.result.interactions().map(|s| s.len()), Some(1));
    }

    #[tokio::test]
    async fn test_check_panic_is_recorded_as_unexpected() {
        let fetcher = Arc::new(
            StaticFetcher::default()
                .with_page("bad", "PANIC".to_string())
                .with_page("good", page(&[("G", "fine")])),
        );
        let checker = Checker::new(fetcher, Arc::new(PanickyExtractor(extractor())), 4);

        let batch = checker.check("bad, good").await;

        match &batch.get("bad").unwrap().result {
            DrugLookupResult::Failure(FailureReason::Unexpected(message)) => {
                assert!(message.contains("extractor exploded"));
            }
            other => panic!("expected unexpected failure, got {other:?}"),
        }
        assert!(batch.get("good").unwrap().result.interactions().is_some());
    }

    #[tokio::test]
    async fn test_lookup_single_drug() {
        let fetcher = StaticFetcher::default().with_page("warfarin", page(&[("Warfarin + Aspirin", " bleeding ")]));
        let (checker, _) = checker(fetcher, 1);

        let (result, warnings) = checker.lookup("warfarin").await;
        assert!(warnings.is_empty());
        assert_eq!(result.interactions().unwrap().get("Warfarin + Aspirin").unwrap().detail(), "bleeding");
    }

    #[tokio::test]
    async fn test_session_run_check_replaces_batch() {
        let fetcher = StaticFetcher::default()
            .with_page("a", page(&[("A", "a")]))
            .with_page("b", page(&[("B", "b")]));
        let (checker, _) = checker(fetcher, 2);
        let mut session = Session::new(checker);

        assert!(session.current().is_none());

        session.run_check("a").await;
        let second = session.run_check("b").await;
        assert_eq!(second.drugs().collect::<Vec<_>>(), vec!["b"]);

        let current = session.current().unwrap();
        assert!(current.get("a").is_none());
    }

    #[tokio::test]
    async fn test_session_reset_drops_batch() {
        let fetcher = StaticFetcher::default().with_page("a", page(&[("A", "a")]));
        let (checker, _) = checker(fetcher, 1);
        let mut session = Session::new(checker);

        session.run_check("a").await;
        assert!(session.current().is_some());

        session.reset();
        assert!(session.current().is_none());

        session.reset();
        assert!(session.current().is_none());
    }

    #[test]
    fn test_checker_from_default_config() {
        let checker = Checker::from_config(&AppConfig::default());
        assert!(checker.is_ok());
    }

    #[test]
    fn test_checker_from_config_rejects_bad_selector() {
        let mut config = AppConfig::default();
        config.markers.section = "div[".into();
        assert!(matches!(Checker::from_config(&config), Err(Error::InvalidSelector { .. })));
    }
}
