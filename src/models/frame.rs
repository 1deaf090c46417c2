use std::fmt;

use bytes::Bytes;

/// Identifies one of the three planes of a 4:2:0 frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    /// Full resolution luma (Y)
    Luma,
    /// Quarter resolution blue-difference chroma (U / Cb)
    ChromaU,
    /// Quarter resolution red-difference chroma (V / Cr)
    ChromaV,
}

impl fmt::Display for PlaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaneKind::Luma => "Y",
            PlaneKind::ChromaU => "U",
            PlaneKind::ChromaV => "V",
        };
        f.write_str(name)
    }
}

/// One image plane as handed over by the camera
///
/// Strides are carried for the host's benefit; conversion only looks at
/// [`Plane::remaining`], the number of bytes actually present.
#[derive(Debug, Clone)]
pub struct Plane {
    data: Bytes,
    row_stride: usize,
    pixel_stride: usize,
}

impl Plane {
    /// Create a plane with explicit strides
    pub fn new(data: impl Into<Bytes>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data: data.into(),
            row_stride,
            pixel_stride,
        }
    }

    /// Create a tightly packed plane (pixel stride 1)
    pub fn packed(data: impl Into<Bytes>, row_stride: usize) -> Self {
        Self::new(data, row_stride, 1)
    }

    /// Number of bytes available in this plane
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Raw plane bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes between the starts of two consecutive rows
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Bytes between two consecutive samples of a row
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }
}

/// The three planes of a YUV 4:2:0 frame, in plane-index order
#[derive(Debug, Clone)]
pub struct FramePlanes {
    /// Plane 0
    pub y: Plane,
    /// Plane 1
    pub u: Plane,
    /// Plane 2
    pub v: Plane,
}

impl FramePlanes {
    /// Group three planes
    pub fn new(y: Plane, u: Plane, v: Plane) -> Self {
        Self { y, u, v }
    }
}

type ReleaseHook = Box<dyn FnOnce() + Send + 'static>;

/// One camera frame, owned by whoever currently processes it
///
/// The release hook runs exactly once, when the frame is dropped. Passing a
/// `RawFrame` by value therefore returns the camera buffer on every exit
/// path, including early returns and unwinding.
pub struct RawFrame {
    width: u32,
    height: u32,
    planes: Option<FramePlanes>,
    release: Option<ReleaseHook>,
}

impl RawFrame {
    /// Create a frame carrying image planes
    pub fn new(width: u32, height: u32, planes: FramePlanes) -> Self {
        Self {
            width,
            height,
            planes: Some(planes),
            release: None,
        }
    }

    /// Create a frame whose camera image is missing
    pub fn without_image(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            planes: None,
            release: None,
        }
    }

    /// Attach the hook that returns the underlying buffer to the camera
    ///
    /// A previously attached hook still runs, before the new one.
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.release = Some(match self.release.take() {
            Some(previous) => Box::new(move || {
                previous();
                hook();
            }),
            None => Box::new(hook),
        });
        self
    }

    /// Declared width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Declared height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Image planes, if the camera delivered an image
    pub fn planes(&self) -> Option<&FramePlanes> {
        self.planes.as_ref()
    }
}

impl Drop for RawFrame {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("planes", &self.planes)
            .field("has_release_hook", &self.release.is_some())
            .finish()
    }
}
