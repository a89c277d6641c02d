//! Coarse RGB quantization used to narrow the candidate search

use crate::analysis::color::Rgb;
use std::borrow::Cow;
use std::collections::HashMap;

/// Quantized color coordinate `(R/g, G/g, B/g)`
pub type BucketKey = [i32; 3];

/// Smallest bucket width in channel units
pub const MIN_BUCKET_WIDTH: u32 = 12;
/// Largest bucket width in channel units
pub const MAX_BUCKET_WIDTH: u32 = 24;

/// Where a candidate list came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateTier {
    /// The cell's own bucket
    Bucket,
    /// The 26 buckets surrounding the cell's own bucket
    Neighborhood,
    /// Every material in the catalog
    Catalog,
}

/// Candidate material indices for one lookup
#[derive(Clone, Debug)]
pub struct Candidates<'a> {
    /// Which lookup tier produced the list
    pub tier: CandidateTier,
    /// Catalog indices in bucket-then-insertion order
    pub indices: Cow<'a, [usize]>,
}

/// 3D color hash of catalog indices
///
/// Bucket contents keep the order in which materials were inserted.
#[derive(Clone, Debug)]
pub struct ColorBuckets {
    width: u32,
    buckets: HashMap<BucketKey, Vec<usize>>,
    material_count: usize,
}

impl ColorBuckets {
    /// Bucket width for a catalog of `material_count` materials
    ///
    /// Larger catalogs get narrower buckets: `256 / sqrt(count / 50)`,
    /// clamped to [`MIN_BUCKET_WIDTH`, `MAX_BUCKET_WIDTH`].
    pub fn bucket_width(material_count: usize) -> u32 {
        let raw = (256.0 / (material_count as f64 / 50.0).sqrt()).floor();
        raw.clamp(f64::from(MIN_BUCKET_WIDTH), f64::from(MAX_BUCKET_WIDTH)) as u32
    }

    /// Bucket the given mean colors; the index of each color is its catalog index
    pub fn new(colors: impl ExactSizeIterator<Item = Rgb>) -> Self {
        let material_count = colors.len();
        let width = Self::bucket_width(material_count);
        let mut buckets: HashMap<BucketKey, Vec<usize>> = HashMap::new();

        for (index, color) in colors.enumerate() {
            buckets
                .entry(quantize(color, width))
                .or_default()
                .push(index);
        }

        Self {
            width,
            buckets,
            material_count,
        }
    }

    /// Channel width of each bucket
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of non-empty buckets
    pub fn occupied(&self) -> usize {
        self.buckets.len()
    }

    /// Key of the bucket containing `color`
    pub fn key(&self, color: Rgb) -> BucketKey {
        quantize(color, self.width)
    }

    /// Materials in the bucket with the given key
    pub fn bucket(&self, key: BucketKey) -> &[usize] {
        self.buckets.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidate materials for a cell of the given color
    ///
    /// Tries the cell's own bucket, then the union of its neighbors at ±1 in
    /// each channel, then falls back to the whole catalog.
    pub fn candidates(&self, color: Rgb) -> Candidates<'_> {
        let key = self.key(color);

        let own = self.bucket(key);
        if !own.is_empty() {
            return Candidates {
                tier: CandidateTier::Bucket,
                indices: Cow::Borrowed(own),
            };
        }

        let mut neighborhood = Vec::new();
        for dr in -1..=1 {
            for dg in -1..=1 {
                for db in -1..=1 {
                    let [r, g, b] = key;
                    neighborhood.extend_from_slice(self.bucket([r + dr, g + dg, b + db]));
                }
            }
        }
        if !neighborhood.is_empty() {
            return Candidates {
                tier: CandidateTier::Neighborhood,
                indices: Cow::Owned(neighborhood),
            };
        }

        Candidates {
            tier: CandidateTier::Catalog,
            indices: Cow::Owned((0..self.material_count).collect()),
        }
    }
}

fn quantize(color: Rgb, width: u32) -> BucketKey {
    let width = width.max(1);
    color
        .channels()
        .map(|channel| (u32::from(channel) / width) as i32)
}
