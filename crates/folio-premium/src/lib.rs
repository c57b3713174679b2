//! Remote premium capability loader for the Folio portfolio tracker.
//!
//! Paying users receive an extra, separately distributed bundle of UI
//! capabilities (statistics renderers, staking views, theme tooling).
//! This crate discovers, fetches, installs, and caches that bundle, and
//! hands the rest of the application lazily resolved handles to its named
//! exports.
//!
//! The bundle is a precompiled dynamic library built against
//! `folio-premium-sdk`; it is fetched from the local backend daemon at
//! most once per process, loaded through the SDK's descriptor ABI, and
//! cached in a process-wide registry for the remainder of the process
//! lifetime.
//!
//! Most consumers only touch the factories in [`capabilities`]:
//!
//! ```rust,no_run
//! use folio_premium::capabilities;
//! use folio_premium::DisplayState;
//!
//! # async fn render() {
//! let statistics = capabilities::premium_statistics();
//! match statistics.resolve().await {
//!     DisplayState::Ready(capability) => {
//!         let view = capability.render(&serde_json::json!({"currency": "USD"}));
//!         // hand `view` to the view layer
//!         # let _ = view;
//!     }
//!     DisplayState::Failed(placeholder) => {
//!         // render the error placeholder
//!         # let _ = placeholder;
//!     }
//!     _ => unreachable!("resolve returns a settled state"),
//! }
//! # }
//! ```

pub mod bundle;
pub mod capabilities;
pub mod client;
pub mod config;
pub mod error;
pub mod lazy;
pub mod loader;
pub mod provider;
pub mod registry;

pub use bundle::{BundleHandle, Capability};
pub use config::PremiumConfig;
pub use error::{PremiumError, Result};
pub use lazy::{
    DisplayState, LazyCapability, LazyOptions, Placeholder, LOADING_DELAY, LOAD_TIMEOUT,
};
pub use loader::PremiumLoader;
pub use provider::{CapabilityProvider, RemoteBundleProvider};
pub use registry::{global_registry, BundleRegistry, SharedRegistry};
