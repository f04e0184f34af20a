//! Small numeric helpers shared by the aggregator and the chart builder.
//!
//! Undefined values (`None` / NaN) are skipped rather than treated as zero.

/// Arithmetic mean of the finite values, or `None` when there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean of the defined entries of an optional series.
pub fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    mean(values.iter().flatten().copied())
}

/// Largest finite value, or `None` when there are none.
pub fn max_defined<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

/// `numerator / denominator`, undefined for a zero denominator.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([f64::NAN, 4.0]), Some(4.0));
    }

    #[test]
    fn test_mean_defined_skips_gaps() {
        let m = mean_defined(&[Some(0.2), None, Some(0.4)]).unwrap();
        assert!((m - 0.3).abs() < 1e-12);
        assert_eq!(mean_defined(&[None, None]), None);
    }

    #[test]
    fn test_max_defined() {
        assert_eq!(max_defined(&[Some(0.1), None, Some(0.7), Some(0.3)]), Some(0.7));
        assert_eq!(max_defined(&[None]), None);
    }

    #[test]
    fn test_ratio_zero_denominator_is_undefined() {
        assert_eq!(ratio(5.0, 0.0), None);
        assert_eq!(ratio(0.0, 0.0), None);
        assert_eq!(ratio(1.0, 4.0), Some(0.25));
    }
}
