//! Mean colors, channel statistics and perceptual color distance

use num_traits::ToPrimitive;

/// Luma weights applied to the squared channel differences (R, G, B)
pub const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// An opaque 8-bit RGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels in R, G, B order
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Perceptually weighted Euclidean distance between two colors
pub fn color_distance(a: Rgb, b: Rgb) -> f64 {
    a.channels()
        .iter()
        .zip(b.channels())
        .zip(LUMA_WEIGHTS)
        .map(|((&x, y), weight)| {
            let delta = f64::from(x) - f64::from(y);
            weight * delta * delta
        })
        .sum::<f64>()
        .sqrt()
}

/// Running sum and sum-of-squares per channel
///
/// Every pushed pixel counts as one sample.
#[derive(Clone, Debug, Default)]
pub struct ChannelAccumulator {
    sums: [f64; 3],
    squares: [f64; 3],
    count: usize,
}

impl ChannelAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one RGB sample
    pub fn push(&mut self, pixel: [u8; 3]) {
        for ((sum, square), value) in self.sums.iter_mut().zip(&mut self.squares).zip(pixel) {
            let value = f64::from(value);
            *sum += value;
            *square += value * value;
        }
        self.count += 1;
    }

    /// Number of samples pushed so far
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Rounded mean color, `None` when no samples were pushed
    pub fn mean(&self) -> Option<Rgb> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let [r, g, b] = self
            .sums
            .map(|sum| (sum / n).round().clamp(0.0, 255.0).to_u8().unwrap_or(u8::MAX));
        Some(Rgb::new(r, g, b))
    }

    /// `sqrt(Var(R) + Var(G) + Var(B))`, zero when empty
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        let total: f64 = self
            .sums
            .iter()
            .zip(&self.squares)
            .map(|(&sum, &square)| {
                let mean = sum / n;
                // Cancellation can leave a tiny negative residue
                (square / n - mean * mean).max(0.0)
            })
            .sum();
        total.sqrt()
    }
}
