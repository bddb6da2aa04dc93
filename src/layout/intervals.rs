use super::types::{Interval, IntervalSeries};

/// Lays `sizes` out in a row, `gap` apart, with `padding` (defaults to `gap`)
/// before the first and after the last interval.
///
/// With `center` the row is shifted so that its midpoint sits at 0, otherwise
/// the first interval starts at `padding`.
pub fn layout_intervals_in_series(
    sizes: &[f32],
    gap: f32,
    padding: Option<f32>,
    center: bool,
) -> IntervalSeries {
    let padding = padding.unwrap_or(gap);
    let mut intervals = Vec::with_capacity(sizes.len());
    let mut cursor = padding;
    for &size in sizes {
        intervals.push(Interval {
            left: cursor,
            center: cursor + size / 2.0,
            right: cursor + size,
            size,
        });
        cursor += size + gap;
    }
    if !sizes.is_empty() {
        cursor -= gap;
    }
    let total_size = cursor + padding;

    if center {
        let shift = total_size / 2.0;
        for interval in &mut intervals {
            interval.left -= shift;
            interval.center -= shift;
            interval.right -= shift;
        }
    }

    IntervalSeries {
        intervals,
        total_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_row_is_just_padding() {
        let series = layout_intervals_in_series(&[], 10.0, Some(7.0), true);
        assert!(series.intervals.is_empty());
        assert_eq!(series.total_size, 14.0);
    }

    #[test]
    fn padding_defaults_to_gap() {
        let series = layout_intervals_in_series(&[40.0], 10.0, None, false);
        assert_eq!(series.intervals[0].left, 10.0);
        assert_eq!(series.total_size, 60.0);
    }

    #[test]
    fn consecutive_intervals_are_one_gap_apart() {
        let sizes = [40.0, 80.0, 10.0, 25.0];
        let series = layout_intervals_in_series(&sizes, 20.0, Some(5.0), false);
        for pair in series.intervals.windows(2) {
            assert_eq!(pair[0].right + 20.0, pair[1].left);
        }
        let sum: f32 = sizes.iter().sum();
        assert_eq!(series.total_size, sum + 20.0 * 3.0 + 2.0 * 5.0);
    }

    #[test]
    fn centered_row_straddles_zero() {
        let series = layout_intervals_in_series(&[40.0, 80.0, 10.0], 10.0, Some(4.0), true);
        let half = series.total_size / 2.0;
        assert_eq!(series.intervals[0].left, -half + 4.0);
        assert_eq!(series.intervals[2].right, half - 4.0);
        for interval in &series.intervals {
            assert_eq!(interval.center, (interval.left + interval.right) / 2.0);
            assert_eq!(interval.size, interval.right - interval.left);
        }
    }
}
