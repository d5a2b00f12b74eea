// Time Provider Port
// The dispatcher tracks robot run durations through this seam; tests can
// pin the clock instead of sleeping.

/// Clock abstraction for duration tracking
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall-clock provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_epoch_millis() {
        let now = SystemTimeProvider.now_millis();
        // Past 2020-01-01T00:00:00Z and monotonic enough for durations
        assert!(now > 1_577_836_800_000);
        assert!(SystemTimeProvider.now_millis() >= now);
    }
}
