//! Crop Lookup Tables
//!
//! Static per-crop constants used as model inputs:
//! - water-need coefficient (0-1, relative irrigation demand)
//! - active growth window as (start month, end month), possibly wrapping year-end
//!
//! Tables are embedded and immutable; there is no mutation path.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::growth::GrowthWindow;

/// Water-need coefficient used when a crop key is not in the table
pub const DEFAULT_WATER_NEED: f64 = 0.6;

/// Supported crop identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropKey {
    Rice,
    Corn,
    Wheat,
    Soybean,
    Leafy,
    Fruit,
}

/// Static profile for a single crop
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CropProfile {
    pub key: CropKey,
    pub water_need: f64,
    pub window: GrowthWindow,
}

// ============================================================================
// EMBEDDED CROP TABLE
// Order is the order valid options are listed to callers.
// ============================================================================

static CROP_PROFILES: &[CropProfile] = &[
    CropProfile { key: CropKey::Rice, water_need: 0.9, window: GrowthWindow::new(4, 9) },
    CropProfile { key: CropKey::Corn, water_need: 0.6, window: GrowthWindow::new(3, 8) },
    CropProfile { key: CropKey::Wheat, water_need: 0.5, window: GrowthWindow::new(11, 4) },
    CropProfile { key: CropKey::Soybean, water_need: 0.55, window: GrowthWindow::new(4, 9) },
    CropProfile { key: CropKey::Leafy, water_need: 0.7, window: GrowthWindow::new(1, 12) },
    CropProfile { key: CropKey::Fruit, water_need: 0.65, window: GrowthWindow::new(3, 10) },
];

impl CropKey {
    /// All crops, in table order
    pub fn all() -> impl Iterator<Item = CropKey> {
        CROP_PROFILES.iter().map(|p| p.key)
    }

    /// Lowercase names of all supported crops
    pub fn names() -> Vec<&'static str> {
        Self::all().map(|c| c.as_str()).collect()
    }

    /// Normalize (trim + lowercase) and look up a crop name
    pub fn parse(raw: &str) -> Option<CropKey> {
        Self::from_key(&raw.trim().to_lowercase())
    }

    /// Look up an already-normalized key, matching exactly
    pub fn from_key(key: &str) -> Option<CropKey> {
        Self::all().find(|c| c.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CropKey::Rice => "rice",
            CropKey::Corn => "corn",
            CropKey::Wheat => "wheat",
            CropKey::Soybean => "soybean",
            CropKey::Leafy => "leafy",
            CropKey::Fruit => "fruit",
        }
    }

    pub fn profile(&self) -> &'static CropProfile {
        // Table rows follow variant declaration order
        &CROP_PROFILES[*self as usize]
    }

    pub fn water_need(&self) -> f64 {
        self.profile().water_need
    }

    pub fn growth_window(&self) -> GrowthWindow {
        self.profile().window
    }
}

impl fmt::Display for CropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All crop profiles, in table order
pub fn crop_profiles() -> &'static [CropProfile] {
    CROP_PROFILES
}

/// Water-need coefficient for a normalized crop key, 0.6 if unknown
///
/// The key is matched exactly; callers normalize with [`CropKey::parse`].
pub fn water_need_for(crop: &str) -> f64 {
    CropKey::from_key(crop)
        .map(|c| c.water_need())
        .unwrap_or(DEFAULT_WATER_NEED)
}

/// Growth window for a normalized crop key, full year if unknown
///
/// The key is matched exactly; callers normalize with [`CropKey::parse`].
pub fn growth_window_for(crop: &str) -> GrowthWindow {
    CropKey::from_key(crop)
        .map(|c| c.growth_window())
        .unwrap_or(GrowthWindow::FULL_YEAR)
}
