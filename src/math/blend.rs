//! Coverage estimation and channel unblending for edge decontamination
//!
//! A pixel at the sprite/background boundary observes a blend
//! `I = alpha * F + (1 - alpha) * B` of the true sprite color `F` and the
//! background `B`. These helpers estimate `alpha` from color and spatial
//! evidence and solve the blend for `F`.

use num_traits::Float;

/// Normalize a distance into a 0-1 coverage estimate
///
/// A distance of zero (indistinguishable from background) maps to zero
/// coverage; distances at or beyond the window saturate at one. A
/// non-positive window saturates immediately.
pub fn coverage_from_distance<F: Float>(distance: F, window: F) -> F {
    if window <= F::zero() {
        return F::one();
    }
    (distance / window).min(F::one()).max(F::zero())
}

/// Combine color and spatial coverage estimates into one alpha value
///
/// The weighted sum is clamped to `[floor, 1]`; the floor keeps the
/// subsequent unblending division away from zero.
pub fn mix_coverage<F: Float>(
    color: F,
    spatial: F,
    color_weight: F,
    spatial_weight: F,
    floor: F,
) -> F {
    color
        .mul_add(color_weight, spatial * spatial_weight)
        .min(F::one())
        .max(floor)
}

/// Solve the compositing equation for one foreground channel
///
/// Inverts `observed = alpha * foreground + (1 - alpha) * background` for
/// the foreground value, dividing by `max(alpha, min_alpha)` and clamping
/// the result to `[0, max_value]`.
pub fn unblend_channel<F: Float>(
    observed: F,
    background: F,
    alpha: F,
    min_alpha: F,
    max_value: F,
) -> F {
    let contamination = (F::one() - alpha) * background;
    let recovered = (observed - contamination) / alpha.max(min_alpha);
    recovered.min(max_value).max(F::zero())
}
