use core::sync::atomic::{AtomicU32, Ordering};

static TOUCH_SAMPLES: AtomicU32 = AtomicU32::new(0);
static TOUCH_RISES: AtomicU32 = AtomicU32::new(0);
static POLARITY_NORMAL: AtomicU32 = AtomicU32::new(0);
static POLARITY_REVERSE: AtomicU32 = AtomicU32::new(0);
static HAND_COMMANDS: AtomicU32 = AtomicU32::new(0);
static REMAIN_ENTRIES: AtomicU32 = AtomicU32::new(0);
static SELF_HEALS: AtomicU32 = AtomicU32::new(0);
static CALIBRATION_FAULTS: AtomicU32 = AtomicU32::new(0);

pub(crate) fn record_touch_sample() {
    TOUCH_SAMPLES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_touch_rise() {
    TOUCH_RISES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_polarity_normal() {
    POLARITY_NORMAL.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_polarity_reverse() {
    POLARITY_REVERSE.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_hand_command() {
    HAND_COMMANDS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_remain_entry() {
    REMAIN_ENTRIES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_self_heal() {
    SELF_HEALS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_calibration_fault() {
    CALIBRATION_FAULTS.fetch_add(1, Ordering::Relaxed);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    pub touch_samples: u32,
    pub touch_rises: u32,
    pub polarity_normal: u32,
    pub polarity_reverse: u32,
    pub hand_commands: u32,
    pub remain_entries: u32,
    pub self_heals: u32,
    pub calibration_faults: u32,
}

pub fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        touch_samples: TOUCH_SAMPLES.load(Ordering::Relaxed),
        touch_rises: TOUCH_RISES.load(Ordering::Relaxed),
        polarity_normal: POLARITY_NORMAL.load(Ordering::Relaxed),
        polarity_reverse: POLARITY_REVERSE.load(Ordering::Relaxed),
        hand_commands: HAND_COMMANDS.load(Ordering::Relaxed),
        remain_entries: REMAIN_ENTRIES.load(Ordering::Relaxed),
        self_heals: SELF_HEALS.load(Ordering::Relaxed),
        calibration_faults: CALIBRATION_FAULTS.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    TOUCH_SAMPLES.store(0, Ordering::Relaxed);
    TOUCH_RISES.store(0, Ordering::Relaxed);
    POLARITY_NORMAL.store(0, Ordering::Relaxed);
    POLARITY_REVERSE.store(0, Ordering::Relaxed);
    HAND_COMMANDS.store(0, Ordering::Relaxed);
    REMAIN_ENTRIES.store(0, Ordering::Relaxed);
    SELF_HEALS.store(0, Ordering::Relaxed);
    CALIBRATION_FAULTS.store(0, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Counters are process-global and other tests bump them concurrently,
    // so only monotonicity is asserted here.
    #[test]
    fn counters_are_monotone() {
        let before = snapshot().touch_samples;
        record_touch_sample();
        assert!(snapshot().touch_samples >= before + 1);
    }
}
