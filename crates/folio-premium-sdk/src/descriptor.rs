//! Bundle descriptor definition.
//!
//! Every premium bundle exports a symbol named `folio_premium_descriptor`
//! returning a pointer to a [`CBundleDescriptor`]. The host validates and
//! converts it into a [`ParsedBundleDescriptor`] before anything else in
//! the bundle is touched.

use crate::PREMIUM_ABI_VERSION;

/// Render entry point of one capability.
///
/// Receives the view props as a JSON buffer and returns an owned JSON
/// buffer (length written through `out_len`), or null on failure. The
/// returned buffer is handed back to the bundle's [`ReleaseFn`].
pub type RenderFn =
    unsafe extern "C" fn(props: *const u8, props_len: usize, out_len: *mut usize) -> *mut u8;

/// Releases a buffer previously returned by a [`RenderFn`].
pub type ReleaseFn = unsafe extern "C" fn(buf: *mut u8, len: usize);

/// One-time setup hook run when the bundle is installed into the host.
pub type SetupFn = unsafe extern "C" fn();

/// Capability entry in the exported table.
#[repr(C)]
pub struct CCapabilityDescriptor {
    /// Capability name (UTF-8, not null-terminated)
    pub name: *const u8,
    pub name_len: usize,

    /// Render entry point
    pub render: Option<RenderFn>,
}

/// Bundle descriptor exported by dynamic bundles.
#[repr(C)]
pub struct CBundleDescriptor {
    /// ABI version - must match [`PREMIUM_ABI_VERSION`]
    pub abi_version: u32,

    /// Registered bundle name; must carry the recognized prefix
    pub name: *const u8,
    pub name_len: usize,

    /// Bundle version (semver)
    pub version: *const u8,
    pub version_len: usize,

    /// Capability table
    pub capabilities: *const CCapabilityDescriptor,
    pub capabilities_len: usize,

    /// One-time setup hook, if the bundle has one
    pub setup: Option<SetupFn>,

    /// Buffer release entry point for render output
    pub release: Option<ReleaseFn>,
}

/// Errors raised while validating a raw descriptor.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("incompatible bundle ABI: expected {expected}, got {got}")]
    IncompatibleAbi { expected: u32, got: u32 },

    #[error("descriptor field {0} is null")]
    NullField(&'static str),

    #[error("descriptor field {0} is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("bundle name is empty")]
    EmptyName,

    #[error("invalid bundle version: {0}")]
    InvalidVersion(String),

    #[error("bundle exports no capabilities")]
    NoCapabilities,

    #[error("capability {0} has no render entry point")]
    MissingRender(String),

    #[error("bundle exports no release entry point")]
    MissingRelease,
}

/// Capability with owned name, validated from the raw table.
#[derive(Clone)]
pub struct ParsedCapability {
    pub name: String,
    pub render: RenderFn,
}

/// Bundle descriptor with owned strings, validated from the raw form.
pub struct ParsedBundleDescriptor {
    pub name: String,
    pub version: semver::Version,
    pub capabilities: Vec<ParsedCapability>,
    pub setup: Option<SetupFn>,
    pub release: ReleaseFn,
}

impl ParsedBundleDescriptor {
    /// Validate a raw descriptor and copy it into owned form.
    ///
    /// # Safety
    /// Every pointer in `raw` must be valid for reads of the paired length
    /// for the duration of the call.
    pub unsafe fn from_raw(raw: &CBundleDescriptor) -> Result<Self, DescriptorError> {
        if raw.abi_version != PREMIUM_ABI_VERSION {
            return Err(DescriptorError::IncompatibleAbi {
                expected: PREMIUM_ABI_VERSION,
                got: raw.abi_version,
            });
        }

        let name = read_str(raw.name, raw.name_len, "name")?;
        if name.is_empty() {
            return Err(DescriptorError::EmptyName);
        }

        let version = read_str(raw.version, raw.version_len, "version")?;
        let version = semver::Version::parse(&version)
            .map_err(|e| DescriptorError::InvalidVersion(e.to_string()))?;

        let release = raw.release.ok_or(DescriptorError::MissingRelease)?;

        if raw.capabilities.is_null() || raw.capabilities_len == 0 {
            return Err(DescriptorError::NoCapabilities);
        }
        let mut capabilities = Vec::with_capacity(raw.capabilities_len);
        for i in 0..raw.capabilities_len {
            let entry = &*raw.capabilities.add(i);
            let cap_name = read_str(entry.name, entry.name_len, "capability name")?;
            if cap_name.is_empty() {
                return Err(DescriptorError::InvalidUtf8("capability name"));
            }
            let render = entry
                .render
                .ok_or_else(|| DescriptorError::MissingRender(cap_name.clone()))?;
            capabilities.push(ParsedCapability {
                name: cap_name,
                render,
            });
        }

        Ok(Self {
            name,
            version,
            capabilities,
            setup: raw.setup,
            release,
        })
    }
}

unsafe fn read_str(
    ptr: *const u8,
    len: usize,
    field: &'static str,
) -> Result<String, DescriptorError> {
    if ptr.is_null() {
        return Err(DescriptorError::NullField(field));
    }
    let bytes = std::slice::from_raw_parts(ptr, len);
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| DescriptorError::InvalidUtf8(field))
}

/// Capability declaration assembled by bundle code.
pub struct CapabilitySpec {
    pub name: String,
    pub render: RenderFn,
}

/// Owned bundle description, turned into a raw descriptor at export time.
pub struct BundleSpec {
    pub name: String,
    pub version: String,
    pub capabilities: Vec<CapabilitySpec>,
    pub setup: Option<SetupFn>,
    pub release: Option<ReleaseFn>,
}

impl BundleSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            capabilities: Vec::new(),
            setup: None,
            release: None,
        }
    }

    pub fn with_capability(mut self, name: impl Into<String>, render: RenderFn) -> Self {
        self.capabilities.push(CapabilitySpec {
            name: name.into(),
            render,
        });
        self
    }

    pub fn with_setup(mut self, setup: SetupFn) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_release(mut self, release: ReleaseFn) -> Self {
        self.release = Some(release);
        self
    }
}

/// Backing storage for an exported descriptor.
///
/// Owns every buffer the raw descriptor points into. The owned fields are
/// never mutated after construction, so the pointers stay valid as long as
/// the storage lives; `declare_bundle!` keeps it in a `static`.
pub struct DescriptorStorage {
    _name: String,
    _version: String,
    _capability_names: Vec<String>,
    _table: Vec<CCapabilityDescriptor>,
    raw: CBundleDescriptor,
}

// Invariant: `raw` points only into the immutable owned fields above.
unsafe impl Send for DescriptorStorage {}
unsafe impl Sync for DescriptorStorage {}

impl DescriptorStorage {
    pub fn new(spec: BundleSpec) -> Self {
        let name = spec.name;
        let version = spec.version;
        let capability_names: Vec<String> =
            spec.capabilities.iter().map(|c| c.name.clone()).collect();
        let table: Vec<CCapabilityDescriptor> = spec
            .capabilities
            .iter()
            .zip(&capability_names)
            .map(|(cap, cap_name)| CCapabilityDescriptor {
                name: cap_name.as_ptr(),
                name_len: cap_name.len(),
                render: Some(cap.render),
            })
            .collect();
        let raw = CBundleDescriptor {
            abi_version: PREMIUM_ABI_VERSION,
            name: name.as_ptr(),
            name_len: name.len(),
            version: version.as_ptr(),
            version_len: version.len(),
            capabilities: table.as_ptr(),
            capabilities_len: table.len(),
            setup: spec.setup,
            release: spec.release,
        };
        Self {
            _name: name,
            _version: version,
            _capability_names: capability_names,
            _table: table,
            raw,
        }
    }

    pub fn raw(&self) -> *const CBundleDescriptor {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn noop_render(
        _props: *const u8,
        _props_len: usize,
        _out_len: *mut usize,
    ) -> *mut u8 {
        std::ptr::null_mut()
    }

    unsafe extern "C" fn noop_release(_buf: *mut u8, _len: usize) {}

    fn spec() -> BundleSpec {
        BundleSpec::new("PremiumComponentsTest", "1.2.3")
            .with_capability("PremiumStatistics", noop_render)
            .with_capability("ThemeManager", noop_render)
            .with_release(noop_release)
    }

    #[test]
    fn test_storage_round_trip() {
        let storage = DescriptorStorage::new(spec());
        let parsed = unsafe { ParsedBundleDescriptor::from_raw(&*storage.raw()) }.unwrap();

        assert_eq!(parsed.name, "PremiumComponentsTest");
        assert_eq!(parsed.version, semver::Version::new(1, 2, 3));
        assert_eq!(parsed.capabilities.len(), 2);
        assert_eq!(parsed.capabilities[0].name, "PremiumStatistics");
        assert_eq!(parsed.capabilities[1].name, "ThemeManager");
        assert!(parsed.setup.is_none());
    }

    #[test]
    fn test_abi_mismatch_rejected() {
        let storage = DescriptorStorage::new(spec());
        let mut raw = unsafe { std::ptr::read(storage.raw()) };
        raw.abi_version = PREMIUM_ABI_VERSION + 1;

        let result = unsafe { ParsedBundleDescriptor::from_raw(&raw) };
        assert!(matches!(
            result,
            Err(DescriptorError::IncompatibleAbi { got, .. }) if got == PREMIUM_ABI_VERSION + 1
        ));
    }

    #[test]
    fn test_missing_release_rejected() {
        let storage = DescriptorStorage::new(
            BundleSpec::new("PremiumComponentsTest", "1.0.0")
                .with_capability("Foo", noop_render),
        );
        let result = unsafe { ParsedBundleDescriptor::from_raw(&*storage.raw()) };
        assert!(matches!(result, Err(DescriptorError::MissingRelease)));
    }

    #[test]
    fn test_empty_capability_table_rejected() {
        let storage = DescriptorStorage::new(
            BundleSpec::new("PremiumComponentsTest", "1.0.0").with_release(noop_release),
        );
        let result = unsafe { ParsedBundleDescriptor::from_raw(&*storage.raw()) };
        assert!(matches!(result, Err(DescriptorError::NoCapabilities)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let storage = DescriptorStorage::new(
            BundleSpec::new("", "1.0.0")
                .with_capability("Foo", noop_render)
                .with_release(noop_release),
        );
        let result = unsafe { ParsedBundleDescriptor::from_raw(&*storage.raw()) };
        assert!(matches!(result, Err(DescriptorError::EmptyName)));
    }

    #[test]
    fn test_bad_version_rejected() {
        let storage = DescriptorStorage::new(
            BundleSpec::new("PremiumComponentsTest", "not-a-version")
                .with_capability("Foo", noop_render)
                .with_release(noop_release),
        );
        let result = unsafe { ParsedBundleDescriptor::from_raw(&*storage.raw()) };
        assert!(matches!(result, Err(DescriptorError::InvalidVersion(_))));
    }
}
