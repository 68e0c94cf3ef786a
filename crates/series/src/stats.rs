//! Per-component summary statistics over non-missing samples.
//!
//! Every statistic takes a component index and skips samples whose value for
//! that component is [`NULL_VALUE`](crate::NULL_VALUE). A component with no
//! usable values yields `None` (or zero for the sum and count).

use crate::sample::NULL_VALUE;
use crate::station::Station;

impl Station {
    fn non_null(&self, component: usize) -> impl Iterator<Item = f64> + '_ {
        self.iter()
            .filter_map(move |s| s.get(component))
            .filter(|&v| v != NULL_VALUE)
    }

    /// Sum of non-missing values; `0.0` if there are none.
    pub fn sum(&self, component: usize) -> f64 {
        self.non_null(component).sum()
    }

    /// Number of non-missing values.
    pub fn n_not_null(&self, component: usize) -> usize {
        self.non_null(component).count()
    }

    /// Arithmetic mean of non-missing values.
    pub fn mean(&self, component: usize) -> Option<f64> {
        let n = self.n_not_null(component);
        (n > 0).then(|| self.sum(component) / n as f64)
    }

    /// Median of non-missing values. An even count averages the two central
    /// values.
    pub fn median(&self, component: usize) -> Option<f64> {
        let mut sorted: Vec<f64> = self.non_null(component).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        if n % 2 == 1 {
            Some(sorted[n / 2])
        } else {
            Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
        }
    }

    pub fn min(&self, component: usize) -> Option<f64> {
        self.non_null(component).reduce(f64::min)
    }

    pub fn max(&self, component: usize) -> Option<f64> {
        self.non_null(component).reduce(f64::max)
    }

    /// `max - min` of non-missing values.
    pub fn range(&self, component: usize) -> Option<f64> {
        self.minmax(component).map(|(lo, hi)| hi - lo)
    }

    /// Minimum and maximum in one pass.
    pub fn minmax(&self, component: usize) -> Option<(f64, f64)> {
        self.non_null(component).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::sample::{NULL_VALUE, Sample};
    use crate::station::Station;
    use approx::assert_abs_diff_eq;
    use hmdf_calendar::Date;

    fn scalar_station(values: &[f64]) -> Station {
        let mut s = Station::new(0);
        for (i, &v) in values.iter().enumerate() {
            let date = Date::from_seconds(i as i64 * 60).unwrap();
            s.push(Sample::scalar(date, v)).unwrap();
        }
        s
    }

    #[test]
    fn nulls_are_excluded() {
        let s = scalar_station(&[1.0, NULL_VALUE, 2.0, 6.0, NULL_VALUE]);
        assert_eq!(s.n_not_null(0), 3);
        assert_abs_diff_eq!(s.sum(0), 9.0);
        assert_abs_diff_eq!(s.mean(0).unwrap(), 3.0);
        assert_eq!(s.min(0), Some(1.0));
        assert_eq!(s.max(0), Some(6.0));
        assert_eq!(s.range(0), Some(5.0));
        assert_eq!(s.minmax(0), Some((1.0, 6.0)));
    }

    #[test]
    fn median_odd() {
        let s = scalar_station(&[5.0, 1.0, 3.0]);
        assert_eq!(s.median(0), Some(3.0));
    }

    #[test]
    fn median_even_averages_central_pair() {
        let s = scalar_station(&[4.0, 1.0, 3.0, 2.0, NULL_VALUE]);
        assert_eq!(s.median(0), Some(2.5));
    }

    #[test]
    fn all_null_component() {
        let s = scalar_station(&[NULL_VALUE, NULL_VALUE]);
        assert_eq!(s.n_not_null(0), 0);
        assert_eq!(s.sum(0), 0.0);
        assert_eq!(s.mean(0), None);
        assert_eq!(s.median(0), None);
        assert_eq!(s.minmax(0), None);
    }

    #[test]
    fn per_component_means_use_own_count() {
        let mut s = Station::new(0);
        let t = |i: i64| Date::from_seconds(i).unwrap();
        s.push(Sample::vector(t(0), 1.0, NULL_VALUE)).unwrap();
        s.push(Sample::vector(t(1), 3.0, 10.0)).unwrap();
        assert_eq!(s.mean(0), Some(2.0));
        assert_eq!(s.mean(1), Some(10.0));
        assert_eq!(s.n_not_null(1), 1);
    }

    #[test]
    fn component_past_dimension_has_no_values() {
        let s = scalar_station(&[1.0, 2.0]);
        assert_eq!(s.n_not_null(1), 0);
        assert_eq!(s.max(1), None);
    }
}
