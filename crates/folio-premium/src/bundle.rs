//! Installed bundle handles and capability values.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use folio_premium_sdk::descriptor::{ParsedBundleDescriptor, ReleaseFn, RenderFn, SetupFn};
use serde_json::Value;

use crate::error::{PremiumError, Result};

/// State shared by every capability of one dynamically loaded bundle.
///
/// The `Library` lives here so the function pointers in the capability
/// table stay valid for as long as any capability is reachable.
struct ForeignTable {
    _library: libloading::Library,
    release: ReleaseFn,
}

#[derive(Clone)]
enum RenderImpl {
    /// Entry point exported by a dynamically loaded bundle
    Foreign {
        render: RenderFn,
        table: Arc<ForeignTable>,
    },
    /// In-process closure (native providers, tests)
    Native(Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>),
}

/// A named UI building block resolved from the premium bundle.
///
/// Cheap to clone; clones share the underlying entry point.
#[derive(Clone)]
pub struct Capability {
    name: String,
    imp: RenderImpl,
}

impl Capability {
    /// Capability backed by an in-process closure.
    pub fn from_fn<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            imp: RenderImpl::Native(Arc::new(render)),
        }
    }

    fn foreign(name: String, render: RenderFn, table: Arc<ForeignTable>) -> Self {
        Self {
            name,
            imp: RenderImpl::Foreign { render, table },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the capability with the given view props.
    pub fn render(&self, props: &Value) -> Result<Value> {
        match &self.imp {
            RenderImpl::Native(render) => render(props),
            RenderImpl::Foreign { render, table } => {
                let raw = serde_json::to_vec(props)
                    .map_err(|e| PremiumError::RenderFailed(e.to_string()))?;
                let mut out_len = 0usize;
                let out = unsafe { render(raw.as_ptr(), raw.len(), &mut out_len) };
                if out.is_null() {
                    return Err(PremiumError::RenderFailed(format!(
                        "capability {} returned no output",
                        self.name
                    )));
                }
                let bytes = unsafe { std::slice::from_raw_parts(out, out_len) }.to_vec();
                unsafe { (table.release)(out, out_len) };
                serde_json::from_slice(&bytes)
                    .map_err(|e| PremiumError::RenderFailed(e.to_string()))
            }
        }
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .finish()
    }
}

/// One installed premium bundle.
///
/// Created at most once per process lifetime and cached in the registry;
/// never explicitly destroyed.
pub struct BundleHandle {
    name: String,
    version: semver::Version,
    capabilities: HashMap<String, Capability>,
    setup: Option<SetupFn>,
    installed: AtomicBool,
    loaded_at: DateTime<Utc>,
}

impl BundleHandle {
    /// Bundle assembled from in-process capabilities.
    pub fn new(
        name: impl Into<String>,
        version: semver::Version,
        capabilities: Vec<Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            capabilities: capabilities
                .into_iter()
                .map(|c| (c.name().to_string(), c))
                .collect(),
            setup: None,
            installed: AtomicBool::new(false),
            loaded_at: Utc::now(),
        }
    }

    /// Bundle backed by a loaded dynamic library.
    pub(crate) fn from_descriptor(
        parsed: ParsedBundleDescriptor,
        library: libloading::Library,
    ) -> Self {
        let table = Arc::new(ForeignTable {
            _library: library,
            release: parsed.release,
        });
        let capabilities = parsed
            .capabilities
            .into_iter()
            .map(|c| {
                let capability = Capability::foreign(c.name.clone(), c.render, table.clone());
                (c.name, capability)
            })
            .collect();
        Self {
            name: parsed.name,
            version: parsed.version,
            capabilities,
            setup: parsed.setup,
            installed: AtomicBool::new(false),
            loaded_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Look up a named capability.
    pub fn capability(&self, name: &str) -> Option<Capability> {
        self.capabilities.get(name).cloned()
    }

    /// Names of every capability the bundle exports, sorted.
    pub fn capability_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.capabilities.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether the one-time setup has already run.
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Claim the one-time setup. Returns true exactly once.
    pub(crate) fn mark_installed(&self) -> bool {
        !self.installed.swap(true, Ordering::SeqCst)
    }

    /// Run the bundle's setup hook, if it has one.
    pub(crate) fn run_setup(&self) {
        if let Some(setup) = self.setup {
            unsafe { setup() };
        }
    }
}

impl fmt::Debug for BundleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleHandle")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("capabilities", &self.capability_names())
            .field("installed", &self.is_installed())
            .finish()
    }
}
