//! Factories for the known premium capabilities.
//!
//! The enumeration is open: a bundle may export more names than listed
//! here, and a newer bundle may drop one, in which case the descriptor
//! settles into its error display instead of rendering.

use crate::lazy::{LazyCapability, LazyOptions};
use crate::loader::PremiumLoader;

/// Capability names exported by current premium bundles.
pub mod names {
    pub const PREMIUM_STATISTICS: &str = "PremiumStatistics";
    pub const ETH2_STAKING: &str = "Eth2Staking";
    pub const UNISWAP_DETAILS: &str = "UniswapDetails";
    pub const SUSHI: &str = "Sushi";
    pub const THEME_CHECKER: &str = "ThemeChecker";
    pub const THEME_SWITCHER: &str = "ThemeSwitcher";
    pub const THEME_MANAGER: &str = "ThemeManager";
}

fn load(name: &str) -> LazyCapability {
    PremiumLoader::global().make_lazy_capability(name, LazyOptions::default())
}

/// The premium statistics dashboard.
pub fn premium_statistics() -> LazyCapability {
    load(names::PREMIUM_STATISTICS)
}

/// Ethereum staking overview.
pub fn eth2_staking() -> LazyCapability {
    load(names::ETH2_STAKING)
}

/// Uniswap LP position details.
pub fn uniswap_details() -> LazyCapability {
    load(names::UNISWAP_DETAILS)
}

/// SushiSwap LP position details.
pub fn sushi() -> LazyCapability {
    load(names::SUSHI)
}

/// Theme entitlement check.
pub fn theme_checker() -> LazyCapability {
    load(names::THEME_CHECKER)
}

/// Light/dark theme switcher.
pub fn theme_switcher() -> LazyCapability {
    load(names::THEME_SWITCHER)
}

/// Custom theme editor.
pub fn theme_manager() -> LazyCapability {
    load(names::THEME_MANAGER)
}
