//! Tests for log level selection and logger installation

#[cfg(test)]
mod tests {
    use mosaictile::io::logging::{init, level_for};
    use simplelog::LevelFilter;

    // Tests each -v step raises the level and saturates at trace
    // Verified by starting at info
    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0, false), LevelFilter::Warn);
        assert_eq!(level_for(1, false), LevelFilter::Info);
        assert_eq!(level_for(2, false), LevelFilter::Debug);
        assert_eq!(level_for(3, false), LevelFilter::Trace);
        assert_eq!(level_for(9, false), LevelFilter::Trace);
    }

    // Tests quiet wins over any verbosity
    // Verified by checking verbosity first
    #[test]
    fn test_quiet_overrides() {
        assert_eq!(level_for(0, true), LevelFilter::Error);
        assert_eq!(level_for(3, true), LevelFilter::Error);
    }

    // Tests the global logger can only be installed once
    // Verified by ignoring the installation result
    #[test]
    fn test_init_once() {
        let _ = init(0, true);
        assert!(!init(0, true));
    }
}
