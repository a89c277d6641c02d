//! Tests for stage progress bars

#[cfg(test)]
mod tests {
    use photomosaic::io::progress::ProgressManager;

    // Tests that hidden managers hand out working bars
    // Verified by leaving the bar length unset
    #[test]
    fn test_hidden_stage_bar() {
        let manager = ProgressManager::hidden();
        assert!(manager.is_hidden());

        let bar = manager.begin_stage("loading", 12);
        bar.inc(5);
        assert_eq!(bar.position(), 5);
        assert_eq!(bar.length(), Some(12));

        ProgressManager::finish_stage(&bar, "done");
        assert!(bar.is_finished());
        manager.finish();
    }

    // Tests that the default manager is visible
    // Verified by defaulting to a hidden manager
    #[test]
    fn test_default_is_visible() {
        assert!(!ProgressManager::default().is_hidden());
    }
}
