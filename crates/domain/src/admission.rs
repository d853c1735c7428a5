//! Admission control: the rule gating power-on requests against the cap.
//!
//! The sum of rated power over powered-on devices must never exceed
//! [`Settings::max_energy`](crate::settings::Settings::max_energy) after a
//! device is turned on. Lowering the cap does not force anything off; the
//! rule is only evaluated when a device asks to be turned on.

use crate::device::Device;
use crate::error::AdmissionError;

/// Total power drawn by the devices that are currently on.
#[must_use]
pub fn total_drawn<'a>(devices: impl IntoIterator<Item = &'a Device>) -> u64 {
    devices
        .into_iter()
        .map(|device| u64::from(device.drawn_power()))
        .sum()
}

/// Decide whether `candidate` may be turned on.
///
/// `devices` is the full registry; the candidate itself is ignored when
/// summing so a stale copy in the list cannot be counted twice.
///
/// # Errors
///
/// Returns [`AdmissionError::CapExceeded`] when the projected total would be
/// strictly greater than `max_energy`.
pub fn check<'a>(
    devices: impl IntoIterator<Item = &'a Device>,
    candidate: &Device,
    max_energy: u32,
) -> Result<u64, AdmissionError> {
    let current = total_drawn(
        devices
            .into_iter()
            .filter(|device| device.id != candidate.id),
    );
    let projected = current + u64::from(candidate.rated_power);
    if projected > u64::from(max_energy) {
        return Err(AdmissionError::CapExceeded {
            requested: candidate.rated_power,
            current,
            projected,
            max: max_energy,
        });
    }
    Ok(projected)
}
