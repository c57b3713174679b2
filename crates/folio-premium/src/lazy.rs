//! Lazy load descriptors.
//!
//! A descriptor defers the resolution of one named capability and exposes
//! the display states a view layer needs while the work is in flight:
//! nothing at first, a loading placeholder once the resolution has been
//! pending past the delay, and finally either the capability or an error
//! placeholder. A descriptor settles exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::warn;

use crate::bundle::Capability;
use crate::loader::PremiumLoader;

/// How long a resolution may stay pending before the loading placeholder
/// is shown. Fast resolutions never flash it.
pub const LOADING_DELAY: Duration = Duration::from_millis(500);

/// How long a resolution may stay unsettled before the descriptor gives
/// up and shows the error placeholder.
pub const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Interim view shown in place of a capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub message: String,
}

impl Placeholder {
    /// Standard placeholder shown while a capability resolves.
    pub fn loading() -> Self {
        Self {
            message: "Loading premium component".to_string(),
        }
    }

    /// Standard placeholder shown when a capability fails to resolve.
    pub fn load_error() -> Self {
        Self {
            message: "Failed to load the premium component".to_string(),
        }
    }

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Overridable display options for a descriptor.
#[derive(Debug, Clone)]
pub struct LazyOptions {
    pub loading: Placeholder,
    pub error: Placeholder,
}

impl Default for LazyOptions {
    fn default() -> Self {
        Self {
            loading: Placeholder::loading(),
            error: Placeholder::load_error(),
        }
    }
}

/// What a consumer should render right now.
#[derive(Debug, Clone)]
pub enum DisplayState {
    /// Resolution has not started, or is in flight within the delay
    Pending,
    /// Resolution is in flight past the delay
    Loading(Placeholder),
    /// The capability resolved
    Ready(Capability),
    /// Resolution failed or timed out
    Failed(Placeholder),
}

impl DisplayState {
    pub fn is_settled(&self) -> bool {
        matches!(self, DisplayState::Ready(_) | DisplayState::Failed(_))
    }
}

/// Deferred handle for one named capability.
///
/// Nothing happens until [`resolve`] is first called; view layers render
/// the states published through [`subscribe`].
///
/// [`resolve`]: LazyCapability::resolve
/// [`subscribe`]: LazyCapability::subscribe
pub struct LazyCapability {
    loader: Arc<PremiumLoader>,
    name: String,
    options: LazyOptions,
    started: AtomicBool,
    state_tx: watch::Sender<DisplayState>,
    state_rx: watch::Receiver<DisplayState>,
}

impl LazyCapability {
    pub(crate) fn new(loader: Arc<PremiumLoader>, name: String, options: LazyOptions) -> Self {
        let (state_tx, state_rx) = watch::channel(DisplayState::Pending);
        Self {
            loader,
            name,
            options,
            started: AtomicBool::new(false),
            state_tx,
            state_rx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> DisplayState {
        self.state_rx.borrow().clone()
    }

    /// Watch display state changes.
    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.state_rx.clone()
    }

    /// Drive the resolution and return the settled display state.
    ///
    /// The first caller starts the work; concurrent callers wait on the
    /// same settlement. The underlying install is not aborted on timeout —
    /// it keeps running and may still populate the install cache for later
    /// descriptors — but this descriptor never changes state again.
    pub async fn resolve(&self) -> DisplayState {
        if self.started.swap(true, Ordering::SeqCst) {
            return self.wait_settled().await;
        }

        let loader = self.loader.clone();
        let name = self.name.clone();
        let mut task = tokio::spawn(async move { loader.resolve_capability(&name).await });

        let delay = tokio::time::sleep(LOADING_DELAY);
        tokio::pin!(delay);
        let deadline = tokio::time::sleep(LOAD_TIMEOUT);
        tokio::pin!(deadline);
        let mut delay_elapsed = false;

        loop {
            tokio::select! {
                _ = &mut delay, if !delay_elapsed => {
                    delay_elapsed = true;
                    self.state_tx
                        .send_replace(DisplayState::Loading(self.options.loading.clone()));
                }
                _ = &mut deadline => {
                    warn!(name = %self.name, "premium capability resolution timed out");
                    return self.settle(DisplayState::Failed(self.options.error.clone()));
                }
                result = &mut task => {
                    let state = match result {
                        Ok(Ok(capability)) => DisplayState::Ready(capability),
                        _ => DisplayState::Failed(self.options.error.clone()),
                    };
                    return self.settle(state);
                }
            }
        }
    }

    /// Publish a settled state unless one is already set.
    fn settle(&self, state: DisplayState) -> DisplayState {
        self.state_tx.send_if_modified(|current| {
            if current.is_settled() {
                false
            } else {
                *current = state;
                true
            }
        });
        self.state()
    }

    async fn wait_settled(&self) -> DisplayState {
        let mut rx = self.state_rx.clone();
        loop {
            let state = rx.borrow_and_update().clone();
            if state.is_settled() {
                return state;
            }
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }
}
