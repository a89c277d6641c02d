//! Aspect-preserving square crop geometry

/// Square region of a source image, in source pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Side of the square
    pub side: u32,
}

impl CropRegion {
    /// Largest square centered on the longer axis of a `width` x `height` image
    ///
    /// The offset along the longer axis is `(longer - shorter) / 2`, rounded
    /// down; the shorter axis is not offset.
    pub const fn centered_square(width: u32, height: u32) -> Self {
        if width > height {
            Self {
                x: (width - height) / 2,
                y: 0,
                side: height,
            }
        } else {
            Self {
                x: 0,
                y: (height - width) / 2,
                side: width,
            }
        }
    }

    /// Whether the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.side == 0
    }
}
