//! Export macros for bundle authors.

/// Generate the FFI exports a premium bundle must provide.
///
/// Takes a function returning the bundle's [`BundleSpec`]; the spec is
/// converted once and kept alive for the process lifetime.
///
/// # Example
///
/// ```rust,ignore
/// use folio_premium_sdk::prelude::*;
///
/// fn bundle_spec() -> BundleSpec {
///     BundleSpec::new("PremiumComponentsAcme", "1.0.0")
///         .with_capability("PremiumStatistics", render_statistics)
///         .with_release(release)
/// }
///
/// declare_bundle!(bundle_spec);
/// ```
///
/// [`BundleSpec`]: crate::descriptor::BundleSpec
#[macro_export]
macro_rules! declare_bundle {
    ($spec_fn:path) => {
        #[no_mangle]
        pub extern "C" fn folio_premium_abi_version() -> u32 {
            $crate::PREMIUM_ABI_VERSION
        }

        #[no_mangle]
        pub extern "C" fn folio_premium_descriptor(
        ) -> *const $crate::descriptor::CBundleDescriptor {
            static STORAGE: ::std::sync::OnceLock<$crate::descriptor::DescriptorStorage> =
                ::std::sync::OnceLock::new();
            STORAGE
                .get_or_init(|| $crate::descriptor::DescriptorStorage::new($spec_fn()))
                .raw()
        }
    };
}
