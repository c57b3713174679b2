//! Folio Premium SDK
//!
//! This SDK provides the ABI boundary between the Folio application and a
//! premium capability bundle. A bundle is a dynamic library built against
//! this crate; it exports a descriptor listing its capabilities, and the
//! host loads it at runtime through that descriptor.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use folio_premium_sdk::prelude::*;
//!
//! fn bundle_spec() -> BundleSpec {
//!     BundleSpec::new("PremiumComponentsAcme", "1.0.0")
//!         .with_capability("PremiumStatistics", render_statistics)
//!         .with_release(release)
//! }
//!
//! declare_bundle!(bundle_spec);
//! ```

pub mod descriptor;
pub mod entry;
pub mod error;
#[macro_use]
pub mod macros;

pub use descriptor::{
    BundleSpec, CBundleDescriptor, CCapabilityDescriptor, CapabilitySpec, DescriptorError,
    DescriptorStorage, ParsedBundleDescriptor, ParsedCapability, ReleaseFn, RenderFn, SetupFn,
};
pub use error::{BundleError, BundleResult};

/// ABI version for dynamic loading.
/// Incremented when breaking changes are made to the bundle interface.
pub const PREMIUM_ABI_VERSION: u32 = 1;

/// Prefix every registered bundle name must carry to be discoverable.
pub const BUNDLE_NAME_PREFIX: &str = "PremiumComponents";

/// Symbol the host resolves to read the bundle's ABI version.
pub const ABI_VERSION_SYMBOL: &[u8] = b"folio_premium_abi_version";

/// Symbol the host resolves to read the bundle descriptor.
pub const DESCRIPTOR_SYMBOL: &[u8] = b"folio_premium_descriptor";

/// Prelude module with common imports for bundle authors.
pub mod prelude {
    pub use crate::descriptor::{BundleSpec, CapabilitySpec, ReleaseFn, RenderFn, SetupFn};
    pub use crate::entry::{release_buffer, render_entry};
    pub use crate::error::{BundleError, BundleResult};
    pub use crate::{BUNDLE_NAME_PREFIX, PREMIUM_ABI_VERSION};
    pub use serde_json::Value;

    // Macros are automatically available due to #[macro_use]
}
