//! Tests for thumbnail color profiles

#[cfg(test)]
mod tests {
    use crate::{rgb, solid, split};
    use photomosaic::analysis::profile::{extract_profile, sample_stride};

    // Tests that small thumbnails are subsampled and large ones are not
    // Verified by always returning a stride of one
    #[test]
    fn test_sample_stride_threshold() {
        assert_eq!(sample_stride(16), 2);
        assert_eq!(sample_stride(63), 2);
        assert_eq!(sample_stride(64), 1);
        assert_eq!(sample_stride(512), 1);
    }

    // Tests a uniform thumbnail profile
    // Verified by reading the alpha channel into the mean
    #[test]
    fn test_uniform_profile() -> photomosaic::Result<()> {
        let profile = extract_profile(&solid(32, 32, [40, 80, 120, 10]))?;

        assert_eq!(profile.mean, rgb(40, 80, 120));
        assert!(profile.variance.abs() < 1e-9);
        Ok(())
    }

    // Tests that a two-color thumbnail reports positive variance and a mid mean
    // Verified by sampling only the first row
    #[test]
    fn test_two_color_profile() -> photomosaic::Result<()> {
        let profile = extract_profile(&split(64, [0, 0, 0, 255], [255, 255, 255, 255]))?;

        assert_eq!(profile.mean, rgb(128, 128, 128));
        assert!(profile.variance > 200.0);
        Ok(())
    }

    // Tests that an empty thumbnail is rejected
    // Verified by returning a black profile for empty input
    #[test]
    fn test_empty_thumbnail_fails() {
        assert!(extract_profile(&solid(0, 0, [0, 0, 0, 0])).is_err());
    }
}
