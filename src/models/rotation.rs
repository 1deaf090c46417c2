use std::fmt;
use std::str::FromStr;

use super::RasterImage;

/// Clockwise rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation
    Deg0,
    /// Quarter turn clockwise
    Deg90,
    /// Half turn
    Deg180,
    /// Three quarter turns clockwise
    Deg270,
}

impl Rotation {
    /// All rotations in ascending angle order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Angle in degrees
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotation for an angle; any multiple of 90 is accepted, including negatives
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// True when width and height trade places
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Error for an angle that is not a quarter turn
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported rotation angle: {0}")]
pub struct InvalidRotation(pub String);

impl FromStr for Rotation {
    type Err = InvalidRotation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('°');
        trimmed
            .parse::<i32>()
            .ok()
            .and_then(Rotation::from_degrees)
            .ok_or_else(|| InvalidRotation(s.to_string()))
    }
}

/// A rotated copy of a raster together with the rotation that produced it
#[derive(Debug, Clone)]
pub struct RotationCandidate {
    /// Rotation applied to the source raster
    pub rotation: Rotation,
    /// The rotated raster
    pub image: RasterImage,
}
