//! Fringe removal: erode near-white halo pixels from the transparent region.
//!
//! After background classification, anti-aliased edges leave a band of
//! pixels that are almost white but slightly blended toward the
//! foreground. This step repeatedly erases opaque pixels that pass the
//! looser fringe threshold *and* touch a transparent pixel (8-connected),
//! peeling one layer of halo per round.
//!
//! Rounds are evaluated against a snapshot: the loop reads from the
//! previous round's grid and writes into a second buffer, then swaps.
//! Erasing in place would let a change propagate across the whole row in
//! a single scan and make the result depend on iteration order.

use image::RgbaImage;
use log::debug;

use crate::types::{ColorThreshold, DefringeOutcome, ERASED};

/// Run the defringe loop in place on `image`.
///
/// Stops as soon as a round erases nothing, or after `max_rounds` rounds.
/// A `max_rounds` of zero leaves the image untouched.
pub fn defringe(image: &mut RgbaImage, threshold: ColorThreshold, max_rounds: u32) -> DefringeOutcome {
    let mut outcome = DefringeOutcome {
        rounds: 0,
        removed: 0,
        converged: false,
    };
    if max_rounds == 0 {
        return outcome;
    }

    let mut next = image.clone();
    while outcome.rounds < max_rounds {
        outcome.rounds += 1;
        let changed = defringe_round(image, &mut next, threshold);
        debug!("defringe round {}: {changed} pixels erased", outcome.rounds);

        if changed == 0 {
            outcome.converged = true;
            break;
        }
        outcome.removed += changed;
        std::mem::swap(image, &mut next);
    }
    outcome
}

/// One erosion round: read `current`, write the result into `next`.
///
/// `next` must have the same dimensions as `current`; its prior contents
/// are overwritten. Returns the number of pixels erased.
fn defringe_round(current: &RgbaImage, next: &mut RgbaImage, threshold: ColorThreshold) -> u64 {
    next.copy_from_slice(current.as_raw());

    let mut changed = 0;
    for (x, y, pixel) in current.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        if a == 0 || !threshold.matches([r, g, b]) {
            continue;
        }
        if has_transparent_neighbor(current, x, y) {
            next.put_pixel(x, y, ERASED);
            changed += 1;
        }
    }
    changed
}

/// Returns `true` if any in-bounds Moore neighbor of `(x, y)` has alpha 0.
///
/// Positions outside the raster do not exist; they never count as
/// transparent.
fn has_transparent_neighbor(image: &RgbaImage, x: u32, y: u32) -> bool {
    let (width, height) = image.dimensions();
    let (x_lo, x_hi) = (x.saturating_sub(1), (x + 1).min(width - 1));
    let (y_lo, y_hi) = (y.saturating_sub(1), (y + 1).min(height - 1));

    (y_lo..=y_hi).any(|ny| {
        (x_lo..=x_hi).any(|nx| (nx, ny) != (x, y) && image.get_pixel(nx, ny).0[3] == 0)
    })
}
