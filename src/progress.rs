//! Progress-callback trait for per-tier extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the orchestrator walks the tier chain.
//!
//! The callback approach keeps the library ignorant of how the host reports
//! progress: the CLI draws a spinner on stderr, the HTTP service installs
//! nothing. The trait is `Send + Sync` because one extractor is shared by
//! every request the server handles.
//!
//! # Example
//!
//! ```rust
//! use pdfsift::{ExtractionConfig, ExtractionProgressCallback, Method};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct PageCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for PageCounter {
//!     fn on_page(&self, _method: Method, _page_num: usize, _char_count: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(PageCounter { pages: AtomicUsize::new(0) });
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{ExtractionResult, Method};
use std::sync::Arc;

/// Called by the orchestrator as it attempts each tier.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called before a tier is attempted.
    fn on_tier_start(&self, method: Method) {
        let _ = method;
    }

    /// Called once per page a tier read, in page order.
    ///
    /// # Arguments
    /// * `page_num`:   1-indexed page number
    /// * `char_count`: characters on the page after normalisation
    fn on_page(&self, method: Method, page_num: usize, char_count: usize) {
        let _ = (method, page_num, char_count);
    }

    /// Called when a tier returned, whether or not it found text.
    fn on_tier_complete(&self, method: Method, total_chars: usize) {
        let _ = (method, total_chars);
    }

    /// Called when a tier failed; the orchestrator continues with the next one.
    fn on_tier_failed(&self, method: Method, error: &str) {
        let _ = (method, error);
    }

    /// Called once with the record about to be returned.
    fn on_extraction_complete(&self, result: &ExtractionResult) {
        let _ = result;
    }
}

/// A no-op implementation, the default when no callback is configured.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        pages: AtomicUsize,
        failures: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_tier_start(&self, _method: Method) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page(&self, _method: Method, _page_num: usize, _char_count: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_tier_failed(&self, _method: Method, _error: &str) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_tier_start(Method::Primary);
        cb.on_page(Method::Primary, 1, 42);
        cb.on_tier_failed(Method::Secondary, "boom");
        cb.on_tier_complete(Method::Ocr, 0);
        cb.on_extraction_complete(&ExtractionResult::exhausted(0, None));
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_tier_start(Method::Primary);
        tracker.on_tier_failed(Method::Primary, "bind failed");
        tracker.on_tier_start(Method::Secondary);
        tracker.on_page(Method::Secondary, 1, 10);
        tracker.on_page(Method::Secondary, 2, 0);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ExtractionProgressCallback>();
    }
}
