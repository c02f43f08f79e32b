//! Request-tagged loading state for backend-backed views
//!
//! Every fetch the dashboard issues goes through a [`Loader`]. Starting a
//! request hands out a [`RequestTag`]; only a response carrying the tag of the
//! newest request is applied, so a slow reply for a host or category the user
//! already left can never overwrite what is on screen.

/// Observable state of a loader
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet, or the selection changed since
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// Last request succeeded
    Loaded(T),
    /// Last request failed with a user-facing message
    Failed(String),
}

/// Identifies one issued request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestTag<K> {
    pub generation: u64,
    pub key: K,
}

/// Outcome of handing a response to [`Loader::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Loading state machine keyed by the selection a request was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct Loader<K, T> {
    state: LoadState<T>,
    key: Option<K>,
    pending: Option<u64>,
    generation: u64,
}

impl<K, T> Default for Loader<K, T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            key: None,
            pending: None,
            generation: 0,
        }
    }
}

impl<K: Clone + PartialEq, T> Loader<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Loaded data, if the last request succeeded
    pub fn data(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Key of the latest request, kept after it resolves
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Start a request for `key`, superseding any request still in flight
    pub fn begin(&mut self, key: K) -> RequestTag<K> {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.key = Some(key.clone());
        self.pending = Some(self.generation);

        RequestTag {
            generation: self.generation,
            key,
        }
    }

    /// Apply a response if `tag` belongs to the request still awaited
    pub fn resolve(&mut self, tag: &RequestTag<K>, result: Result<T, String>) -> Resolution {
        if !self.is_current(tag) {
            return Resolution::Stale;
        }

        self.pending = None;
        self.state = match result {
            Ok(data) => LoadState::Loaded(data),
            Err(message) => LoadState::Failed(message),
        };
        Resolution::Applied
    }

    /// Back to idle; every response still in flight becomes stale
    pub fn reset(&mut self) {
        self.state = LoadState::Idle;
        self.key = None;
        self.pending = None;
    }

    fn is_current(&self, tag: &RequestTag<K>) -> bool {
        self.pending == Some(tag.generation) && self.key.as_ref() == Some(&tag.key)
    }
}
