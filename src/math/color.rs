//! Color arithmetic over RGB triples in 0-255 channel space

/// An RGB color with `f64` channels in 0-255 space
pub type Rgb = [f64; 3];

/// Squared Euclidean distance between two colors
///
/// Kept squared so per-pixel loops can compare against squared tolerances
/// without taking roots.
#[must_use]
pub fn distance_squared(a: Rgb, b: Rgb) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    db.mul_add(db, dr.mul_add(dr, dg * dg))
}

/// Euclidean distance between two colors
#[must_use]
pub fn distance(a: Rgb, b: Rgb) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Per-channel median of a set of colors
///
/// Returns `None` for an empty set. Channels are ordered with `total_cmp`,
/// so NaN values cannot panic the sort. Even-sized sets take the midpoint
/// of the two central values.
#[must_use]
pub fn channel_median(colors: &[Rgb]) -> Option<Rgb> {
    if colors.is_empty() {
        return None;
    }

    let mut median = [0.0; 3];
    for (channel, slot) in median.iter_mut().enumerate() {
        let mut values: Vec<f64> = colors
            .iter()
            .map(|color| color.get(channel).copied().unwrap_or(0.0))
            .collect();
        values.sort_unstable_by(f64::total_cmp);

        let mid = values.len() / 2;
        *slot = if values.len() % 2 == 0 {
            let low = values.get(mid - 1).copied().unwrap_or(0.0);
            let high = values.get(mid).copied().unwrap_or(0.0);
            f64::midpoint(low, high)
        } else {
            values.get(mid).copied().unwrap_or(0.0)
        };
    }

    Some(median)
}

/// Per-channel mean of a set of colors
///
/// Returns `None` for an empty set.
#[must_use]
pub fn channel_mean(colors: &[Rgb]) -> Option<Rgb> {
    if colors.is_empty() {
        return None;
    }

    let count = colors.len() as f64;
    let mut mean = [0.0; 3];
    for color in colors {
        for (slot, &value) in mean.iter_mut().zip(color.iter()) {
            *slot += value;
        }
    }
    for slot in &mut mean {
        *slot /= count;
    }

    Some(mean)
}

#[cfg(test)]
mod tests {
    use super::{channel_mean, channel_median, distance, distance_squared};

    #[test]
    fn test_distance_squared_matches_euclidean() {
        let black = [0.0, 0.0, 0.0];
        let magenta = [255.0, 0.0, 255.0];

        assert!((distance_squared(black, magenta) - 130_050.0).abs() < f64::EPSILON);
        assert!((distance(black, magenta) - 130_050.0_f64.sqrt()).abs() < 1e-9);
        assert!(distance_squared(magenta, magenta).abs() < f64::EPSILON);
    }

    #[test]
    fn test_channel_median_odd_set() {
        let colors = [[10.0, 0.0, 5.0], [30.0, 0.0, 1.0], [20.0, 0.0, 9.0]];
        let median = channel_median(&colors);
        assert_eq!(median, Some([20.0, 0.0, 5.0]));
    }

    #[test]
    fn test_channel_median_even_set_takes_midpoint() {
        let colors = [[10.0, 4.0, 0.0], [20.0, 8.0, 0.0]];
        let median = channel_median(&colors);
        assert_eq!(median, Some([15.0, 6.0, 0.0]));
    }

    #[test]
    fn test_empty_sets_yield_none() {
        assert_eq!(channel_median(&[]), None);
        assert_eq!(channel_mean(&[]), None);
    }

    #[test]
    fn test_channel_mean() {
        let colors = [[0.0, 0.0, 30.0], [10.0, 0.0, 0.0]];
        assert_eq!(channel_mean(&colors), Some([5.0, 0.0, 15.0]));
    }
}
