use std::env;
use tracing::warn;

/// Default minimum similarity percentage for a pair to be clustered.
pub const DEFAULT_THRESHOLD: u8 = 25;

/// Environment variable overriding the clustering threshold.
pub const THRESHOLD_ENV: &str = "SIMCLUSTER_THRESHOLD";

/// Retrieves the similarity threshold from the environment.
///
/// # Returns
/// - The value of `SIMCLUSTER_THRESHOLD` when set and within 0-100,
///   otherwise `DEFAULT_THRESHOLD`. An unparsable or out-of-range
///   value is reported and ignored rather than aborting the run.
pub fn similarity_threshold() -> u8 {
    match env::var(THRESHOLD_ENV) {
        Ok(raw) => match raw.trim().parse::<u8>() {
            Ok(value) if value <= 100 => value,
            _ => {
                warn!(
                    "Invalid {} value '{}', falling back to {}",
                    THRESHOLD_ENV, raw, DEFAULT_THRESHOLD
                );
                DEFAULT_THRESHOLD
            }
        },
        Err(_) => DEFAULT_THRESHOLD,
    }
}
