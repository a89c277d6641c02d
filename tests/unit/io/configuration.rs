//! Tests for parameter defaults, validation and canvas sizing

#[cfg(test)]
mod tests {
    use photomosaic::MosaicError;
    use photomosaic::io::configuration::{
        GRID_SIZE_RANGE, MAX_OUTPUT_RESOLUTION, MAX_PREVIEW_RESOLUTION, MosaicParameters,
    };

    // Tests that the defaults are valid
    // Verified by setting the default contrast outside its range
    #[test]
    fn test_defaults_validate() {
        let parameters = MosaicParameters::default();
        assert!(parameters.validate().is_ok());
        assert_eq!(parameters.grid_size, 80);
        assert_eq!(parameters.output_resolution, 3200);
    }

    // Tests that each out-of-range field is named in the error
    // Verified by skipping the brightness check
    #[test]
    fn test_out_of_range_fields_rejected() {
        let cases = [
            (
                MosaicParameters {
                    grid_size: GRID_SIZE_RANGE.end() + 1,
                    ..MosaicParameters::default()
                },
                "grid_size",
            ),
            (
                MosaicParameters {
                    brightness: 2.5,
                    ..MosaicParameters::default()
                },
                "brightness",
            ),
            (
                MosaicParameters {
                    color_tolerance: f64::NAN,
                    ..MosaicParameters::default()
                },
                "color_tolerance",
            ),
            (
                MosaicParameters {
                    output_resolution: 8000,
                    ..MosaicParameters::default()
                },
                "output_resolution",
            ),
        ];

        for (parameters, expected) in cases {
            match parameters.validate() {
                Err(MosaicError::InvalidParameter { parameter, .. }) => {
                    assert_eq!(parameter, expected);
                }
                other => panic!("expected {expected} to be rejected, got {other:?}"),
            }
        }
    }

    // Tests canvas sides for the output and preview passes
    // Verified by capping the preview at the output cap
    #[test]
    fn test_canvas_sides() {
        let small = MosaicParameters {
            output_resolution: 800,
            ..MosaicParameters::default()
        };
        assert_eq!(small.output_side(), 800);
        assert_eq!(small.preview_side(), 800);

        let large = MosaicParameters {
            output_resolution: MAX_OUTPUT_RESOLUTION,
            ..MosaicParameters::default()
        };
        assert_eq!(large.output_side(), MAX_OUTPUT_RESOLUTION);
        assert_eq!(large.preview_side(), MAX_PREVIEW_RESOLUTION);
    }
}
