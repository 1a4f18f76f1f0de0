/// Summary of a sample of scores or coefficients.
///
/// Spread uses population formulas (divide by `n`). For an even-sized sample
/// the median is the midpoint of the two middle values.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub variance: f32,
    pub std_dev: f32,
    /// `std_dev / (max - min)`, or 0 for a constant sample.
    pub normalized_std_dev: f32,
}

impl DescriptiveStats {
    /// Summarizes `values` in any order; `None` for an empty sample.
    ///
    /// ```
    /// # use cognito_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!((stats.min, stats.max), (1.0, 5.0));
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.std_dev, 2.0_f32.sqrt());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut sample: Vec<f32> = values.into_iter().collect();
        sample.sort_by(f32::total_cmp);
        Self::summarize(&sample)
    }

    #[expect(clippy::cast_precision_loss)]
    fn summarize(sorted: &[f32]) -> Option<Self> {
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            f32::midpoint(sorted[mid - 1], sorted[mid])
        } else {
            sorted[mid]
        };
        let mean = mean(sorted.iter().copied())?;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / sorted.len() as f32;
        let std_dev = variance.sqrt();
        let range = max - min;
        let normalized_std_dev = if range > 0.0 { std_dev / range } else { 0.0 };

        Some(Self {
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            normalized_std_dev,
        })
    }
}

/// Arithmetic mean, or `None` for an empty sample.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}
