//! Asset unit loading states.

/// The current position of a unit in its load/unload lifecycle.
///
/// This field is the sole source of truth for payload residency:
/// `Loaded` means the payload handle exists and is ready for use;
/// `Unloaded` and `Unloading` mean it is absent or being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// The unit's payload has not been created, or has been released.
    #[default]
    Unloaded,

    /// A load has been requested and has not completed yet.
    Loading,

    /// The payload is resident and ready for use.
    Loaded,

    /// The last load attempt failed. Retryable via another load request.
    Failed,

    /// An unload has been requested and has not completed yet.
    Unloading,
}

impl LoadState {
    /// Returns `true` if the payload has not been created or was released.
    pub fn is_unloaded(&self) -> bool {
        matches!(self, LoadState::Unloaded)
    }

    /// Returns `true` if a load is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Returns `true` if the payload is resident.
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }

    /// Returns `true` if the last load attempt failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed)
    }

    /// Returns `true` if an unload is in flight.
    pub fn is_unloading(&self) -> bool {
        matches!(self, LoadState::Unloading)
    }
}
