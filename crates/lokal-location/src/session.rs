//! Per-page resolution state with a teardown guard.
//!
//! A page moves `Idle → Loading → Resolved` on every navigation. There is
//! no error state: a failed directory load still ends in `Resolved`, with
//! fallback names. If the page is torn down, or navigates again, while a
//! resolution is in flight, that resolution still completes (and fills the
//! cache) but its result is not applied.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::resolved::ResolvedLocation;
use crate::resolver::{LocationResolver, ResolutionKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    Idle,
    Loading { key: ResolutionKey },
    Resolved(Arc<ResolvedLocation>),
}

#[derive(Debug)]
struct PageState {
    mounted: AtomicBool,
    generation: AtomicU64,
    state: Mutex<ResolutionState>,
}

impl PageState {
    fn is_current(&self, generation: u64) -> bool {
        self.mounted.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    fn set(&self, state: ResolutionState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

/// Location state owned by one mounted page.
#[derive(Debug)]
pub struct PageSession {
    resolver: LocationResolver,
    page: Arc<PageState>,
}

/// Tears a [`PageSession`] down from elsewhere, e.g. a navigation handler
/// running while the page is awaiting a resolution.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    page: Arc<PageState>,
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.page.mounted.store(false, Ordering::SeqCst);
    }
}

impl PageSession {
    #[must_use]
    pub fn new(resolver: LocationResolver) -> Self {
        Self {
            resolver,
            page: Arc::new(PageState {
                mounted: AtomicBool::new(true),
                generation: AtomicU64::new(0),
                state: Mutex::new(ResolutionState::Idle),
            }),
        }
    }

    #[must_use]
    pub fn state(&self) -> ResolutionState {
        self.page
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The applied location, if the page has one.
    #[must_use]
    pub fn location(&self) -> Option<Arc<ResolvedLocation>> {
        match self.state() {
            ResolutionState::Resolved(location) => Some(location),
            ResolutionState::Idle | ResolutionState::Loading { .. } => None,
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.page.mounted.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            page: Arc::clone(&self.page),
        }
    }

    pub fn teardown(&self) {
        self.teardown_handle().teardown();
    }

    /// Resolves new route slugs for this page.
    ///
    /// Returns the applied location, or `None` if the page was torn down or
    /// navigated elsewhere before the resolution finished.
    pub async fn navigate(
        &self,
        province: &str,
        municipality: Option<&str>,
    ) -> Option<Arc<ResolvedLocation>> {
        self.navigate_to(ResolutionKey::new(province, municipality, None))
            .await
    }

    /// Like [`PageSession::navigate`], for an explicit key.
    pub async fn navigate_to(&self, key: ResolutionKey) -> Option<Arc<ResolvedLocation>> {
        if !self.is_mounted() {
            return None;
        }
        let generation = self.page.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.page.set(ResolutionState::Loading { key: key.clone() });

        let resolved = self.resolver.resolve_key(key).await;

        if !self.page.is_current(generation) {
            tracing::debug!(generation, "discarding resolution for a stale page state");
            return None;
        }
        self.page.set(ResolutionState::Resolved(Arc::clone(&resolved)));
        Some(resolved)
    }
}
