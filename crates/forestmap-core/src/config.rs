//! Viewer configuration supplied by the embedding settings provider.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Back-buffer resolution. Each dimension must be a positive multiple of 8;
/// the presentation path relies on that for pixel-perfect stretch blits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(i32, i32)", into = "(i32, i32)")]
pub struct Resolution {
    width: i32,
    height: i32,
}

impl Resolution {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 || width % 8 != 0 || height % 8 != 0 {
            return Err(Error::InvalidResolution { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

impl TryFrom<(i32, i32)> for Resolution {
    type Error = Error;

    fn try_from((width, height): (i32, i32)) -> Result<Self> {
        Self::new(width, height)
    }
}

impl From<Resolution> for (i32, i32) {
    fn from(r: Resolution) -> Self {
        (r.width, r.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub resolution: Resolution,
    /// Face name used for every label font tier.
    pub font_face: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution { width: 1920, height: 1080 },
            font_face: "Consolas".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_accepts_multiples_of_eight() {
        let r = Resolution::new(1280, 720).expect("valid resolution");
        assert_eq!((r.width(), r.height()), (1280, 720));
    }

    #[test]
    fn resolution_rejects_off_grid_and_non_positive_dimensions() {
        assert!(Resolution::new(1281, 720).is_err());
        assert!(Resolution::new(1280, 721).is_err());
        assert!(Resolution::new(0, 720).is_err());
        assert!(Resolution::new(1280, -8).is_err());
    }

    #[test]
    fn resolution_validates_through_serde() {
        let r: Resolution = serde_json::from_str("[640, 480]").expect("valid");
        assert_eq!(r.width(), 640);
        assert!(serde_json::from_str::<Resolution>("[641, 480]").is_err());
    }
}
