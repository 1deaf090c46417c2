use std::fmt;

use super::FramePlanes;

/// Byte sizes of the three planes of one frame
///
/// Rendered as three lines, one per plane, for display next to the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Luma plane bytes
    pub y_size: usize,
    /// U plane bytes
    pub u_size: usize,
    /// V plane bytes
    pub v_size: usize,
}

impl DiagnosticReport {
    /// Measure the planes of a frame
    pub fn from_planes(planes: &FramePlanes) -> Self {
        Self {
            y_size: planes.y.remaining(),
            u_size: planes.u.remaining(),
            v_size: planes.v.remaining(),
        }
    }

    /// Total bytes across all planes
    pub fn total(&self) -> usize {
        self.y_size + self.u_size + self.v_size
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Y buffer size: {}", self.y_size)?;
        writeln!(f, "U buffer size: {}", self.u_size)?;
        write!(f, "V buffer size: {}", self.v_size)
    }
}
