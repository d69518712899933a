use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

/// Jittered sleep between batch profiles. The base comes from the caller
/// (`--delay`); jitter keeps request spacing irregular.
pub fn profile_delay(base_secs: u64) {
    if base_secs == 0 {
        return;
    }
    let mut rng = rand::thread_rng();
    let delay_secs = rng.gen_range(base_secs..=base_secs + base_secs / 2 + 1);
    info!("Waiting for {} seconds before the next profile...", delay_secs);
    thread::sleep(Duration::from_secs(delay_secs));
}
