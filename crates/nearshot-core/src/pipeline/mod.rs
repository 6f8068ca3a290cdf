//! Pipeline orchestration: locate → search → fetch → decode.
//!
//! [`SearchPipeline`] runs exactly one sequence per invocation and reports
//! a single terminal [`SearchOutcome`]. Overlapping invocations are
//! coalesced by a single-flight flag so rapid repeated requests cost one
//! network round trip, not several.

pub mod decode;

pub use decode::{DecodedImage, ImageDecoder};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PipelineError;
use crate::location::LocationProvider;
use crate::search::PhotoSearch;
use crate::types::{GeoCoordinate, PhotoRecord};

/// Terminal result of one pipeline run.
pub enum SearchOutcome {
    /// A photo was found, downloaded, and decoded
    Found {
        record: PhotoRecord,
        image: DecodedImage,
        coordinate: GeoCoordinate,
    },
    /// The search returned no usable records
    Empty,
    /// A stage failed; the run was abandoned
    Failed(PipelineError),
}

/// Clears the in-flight flag when the run ends, however it ends.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then(|| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates one location→search→fetch→decode sequence.
///
/// All collaborators are explicitly constructed and passed in; the
/// pipeline is `Clone` (shared `Arc`s) so a UI layer can hand copies to
/// event handlers. The three suspension points — fix, search, download —
/// are strictly sequential; each step depends on the previous step's
/// output.
#[derive(Clone)]
pub struct SearchPipeline {
    location: Arc<dyn LocationProvider>,
    search: Arc<dyn PhotoSearch>,
    decoder: Arc<ImageDecoder>,
    in_flight: Arc<AtomicBool>,
}

impl SearchPipeline {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        search: Arc<dyn PhotoSearch>,
        decoder: ImageDecoder,
    ) -> Self {
        Self {
            location,
            search,
            decoder: Arc::new(decoder),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a run is currently executing.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run the pipeline to completion.
    ///
    /// Returns `None` without side effects if another run is already in
    /// flight (single-flight policy).
    pub async fn run(&self) -> Option<SearchOutcome> {
        let _guard = match InFlightGuard::acquire(&self.in_flight) {
            Some(guard) => guard,
            None => {
                tracing::debug!("search already in flight, ignoring request");
                return None;
            }
        };
        Some(self.execute().await)
    }

    /// Spawn a run on the runtime and deliver its outcome once.
    ///
    /// Returns whether a run was actually started; `false` means another
    /// run is in flight and the request was dropped. The in-flight slot is
    /// reserved before spawning, so two back-to-back calls can never both
    /// start. The outcome is delivered even if the caller has moved on
    /// (there is no cancellation; an abandoned run still terminates).
    pub fn start<F>(&self, on_complete: F) -> bool
    where
        F: FnOnce(SearchOutcome) + Send + 'static,
    {
        let Some(guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("search already in flight, ignoring request");
            return false;
        };

        let pipeline = self.clone();
        tokio::spawn(async move {
            let outcome = pipeline.execute().await;
            // Clear the flag before delivery so the consumer may start a
            // new run from inside the callback.
            drop(guard);
            on_complete(outcome);
        });
        true
    }

    async fn execute(&self) -> SearchOutcome {
        let coordinate = match self.location.current_fix().await {
            Ok(coordinate) => coordinate,
            Err(e) => return SearchOutcome::Failed(e),
        };
        tracing::info!(
            provider = self.location.name(),
            lat = coordinate.lat,
            lon = coordinate.lon,
            "got a fix"
        );

        let records = match self.search.search(coordinate).await {
            Ok(records) => records,
            Err(e) => return SearchOutcome::Failed(e),
        };

        // First (nearest) record only. If its fetch or decode fails the
        // run terminates; there is no fallback to the next candidate.
        let Some(record) = records.into_iter().next() else {
            tracing::info!("no photos near fix");
            return SearchOutcome::Empty;
        };
        tracing::debug!(id = %record.id, url = %record.url, "selected nearest photo");

        let bytes = match self.search.fetch_bytes(&record.url).await {
            Ok(bytes) => bytes,
            Err(e) => return SearchOutcome::Failed(e),
        };

        let image = match self.decoder.decode(bytes, &record.url).await {
            Ok(image) => image,
            Err(e) => return SearchOutcome::Failed(e),
        };
        tracing::debug!(
            width = image.width,
            height = image.height,
            "decoded photo"
        );

        SearchOutcome::Found {
            record,
            image,
            coordinate,
        }
    }
}
