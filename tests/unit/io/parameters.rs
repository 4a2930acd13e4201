//! Tests for parameter defaults, validation and output path resolution

#[cfg(test)]
mod tests {
    use mosaictile::MosaicError;
    use mosaictile::ingestion::OrientationFilter;
    use mosaictile::io::parameters::MosaicParameters;
    use std::path::{Path, PathBuf};

    // Tests new() fills in the documented defaults
    // Verified by changing the default multiplier
    #[test]
    fn test_defaults() {
        let parameters = MosaicParameters::new("photo.jpg", "tiles");
        assert_eq!(parameters.tile_multiplier, 10);
        assert_eq!((parameters.ratio_width, parameters.ratio_height), (1, 1));
        assert_eq!(parameters.upscale, 1);
        assert!(parameters.epsilon.abs() < f64::EPSILON);
        assert!(!parameters.mirror);
        assert!(parameters.validate().is_ok());
    }

    // Tests the tile size and orientation follow the ratio
    // Verified by multiplying only the width
    #[test]
    fn test_tile_size_and_orientation() {
        let mut parameters = MosaicParameters::new("photo.jpg", "tiles");
        parameters.ratio_width = 2;
        parameters.ratio_height = 3;
        parameters.tile_multiplier = 4;

        let size = parameters.tile_size().unwrap();
        assert_eq!((size.width(), size.height()), (8, 12));
        assert_eq!(
            parameters.orientation_filter(),
            OrientationFilter::PortraitRequired
        );
        assert_eq!(parameters.tile_source().directory(), Path::new("tiles"));
    }

    // Tests the default output name derives from the target's base name
    // Verified by keeping the target's extension
    #[test]
    fn test_default_output_name() {
        let parameters = MosaicParameters::new("pictures/photo.png", "tiles");
        assert_eq!(parameters.output_file_name(), "photo_mosaic.jpg");
        assert_eq!(parameters.output_path(), PathBuf::from("photo_mosaic.jpg"));
    }

    // Tests the base name ends at the first dot of a multi-dot file name
    // Verified by cutting at the last dot instead
    #[test]
    fn test_default_output_name_multiple_dots() {
        let parameters = MosaicParameters::new("pictures/photo.v2.jpg", "tiles");
        assert_eq!(parameters.output_file_name(), "photo_mosaic.jpg");

        let parameters = MosaicParameters::new("holiday.2024.final.png", "tiles");
        assert_eq!(parameters.output_file_name(), "holiday_mosaic.jpg");
    }

    // Tests explicit names and directories are joined
    // Verified by ignoring the output directory
    #[test]
    fn test_explicit_output() {
        let mut parameters = MosaicParameters::new("photo.png", "tiles");
        parameters.output_name = Some("final.png".to_string());
        parameters.output_dir = Some(PathBuf::from("renders"));
        assert_eq!(parameters.output_path(), Path::new("renders").join("final.png"));

        parameters.output_name = None;
        assert_eq!(
            parameters.output_path(),
            Path::new("renders").join("photo_mosaic.jpg")
        );
    }

    // Tests each invalid numeric parameter is reported
    // Verified by accepting a zero upscale
    #[test]
    fn test_validate_rejects() {
        let base = MosaicParameters::new("photo.jpg", "tiles");

        let cases = [
            MosaicParameters {
                ratio_width: 0,
                ..base.clone()
            },
            MosaicParameters {
                tile_multiplier: 0,
                ..base.clone()
            },
            MosaicParameters {
                upscale: 0,
                ..base.clone()
            },
            MosaicParameters {
                epsilon: -0.01,
                ..base.clone()
            },
            MosaicParameters {
                epsilon: f64::NAN,
                ..base.clone()
            },
            MosaicParameters {
                ratio_width: u32::MAX,
                ..base
            },
        ];

        for parameters in cases {
            assert!(matches!(
                parameters.validate(),
                Err(MosaicError::InvalidParameter { .. })
            ));
        }
    }
}
