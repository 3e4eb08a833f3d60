// File: crates/storyline-core/src/scale.rs
// Summary: Linear, band, and time scales mapping data space to mount pixels.

use chrono::{Datelike, NaiveDate};

/// Data-space value (magnitude, numeric x, or day number for dates).
pub type Value = f64;

/// Continuous scale mapping `[d0, d1]` onto `[r0, r1]` pixels.
/// Ranges may be inverted (`r0 > r1`) for a y axis growing upwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub d0: Value,
    pub d1: Value,
    pub r0: f32,
    pub r1: f32,
}

impl LinearScale {
    pub fn new(domain: (Value, Value), range: (f32, f32)) -> Self {
        let (mut d0, mut d1) = domain;
        if !d0.is_finite() || !d1.is_finite() {
            d0 = 0.0;
            d1 = 1.0;
        }
        if (d1 - d0).abs() < 1e-12 { d1 = d0 + 1.0; }
        Self { d0, d1, r0: range.0, r1: range.1 }
    }

    #[inline]
    pub fn to_px(&self, v: Value) -> f32 {
        let t = (v - self.d0) / (self.d1 - self.d0);
        self.r0 + (t as f32) * (self.r1 - self.r0)
    }

    #[inline]
    pub fn from_px(&self, px: f32) -> Value {
        let span = (self.r1 - self.r0) as f64;
        if span.abs() < 1e-9 { return self.d0; }
        self.d0 + ((px - self.r0) as f64 / span) * (self.d1 - self.d0)
    }

    pub fn domain(&self) -> (Value, Value) { (self.d0, self.d1) }
}

/// Ordinal scale dividing a pixel range into equal bands, one per category.
/// `padding` is used for both inner and outer padding (fraction of a step).
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    categories: Vec<String>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    pub fn new(categories: Vec<String>, range: (f32, f32), padding: f32) -> Self {
        let n = categories.len() as f32;
        let p = padding.clamp(0.0, 0.95);
        let span = range.1 - range.0;
        let step = if n > 0.0 { span / (n + p).max(1e-6) } else { span };
        let bandwidth = step * (1.0 - p);
        let start = range.0 + (span - step * (n - p)) * 0.5;
        Self { categories, start, step, bandwidth }
    }

    /// Left edge of the band for `category`.
    pub fn position(&self, category: &str) -> Option<f32> {
        self.index_of(category).map(|i| self.start + self.step * i as f32)
    }

    pub fn center(&self, category: &str) -> Option<f32> {
        self.position(category).map(|x| x + self.bandwidth * 0.5)
    }

    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    pub fn bandwidth(&self) -> f32 { self.bandwidth }
    pub fn categories(&self) -> &[String] { &self.categories }
}

/// Calendar scale: dates map to day numbers, then linearly to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f32, f32)) -> Self {
        Self { linear: LinearScale::new((day_number(domain.0), day_number(domain.1)), range) }
    }

    pub fn to_px(&self, date: NaiveDate) -> f32 { self.linear.to_px(day_number(date)) }

    pub fn from_px(&self, px: f32) -> Option<NaiveDate> {
        let days = self.linear.from_px(px).round() as i32;
        NaiveDate::from_num_days_from_ce_opt(days)
    }

    /// January 1st ticks with a year step chosen so roughly `count` labels fit.
    pub fn year_ticks(&self, count: usize) -> Vec<NaiveDate> {
        let (Some(a), Some(b)) = (
            NaiveDate::from_num_days_from_ce_opt(self.linear.d0 as i32),
            NaiveDate::from_num_days_from_ce_opt(self.linear.d1 as i32),
        ) else {
            return Vec::new();
        };
        let years = (b.year() - a.year()).max(1) as f64;
        let step = crate::grid::nice_step(years, count).max(1.0) as i32;
        let first = ((a.year() + step - 1) / step) * step;
        (first..=b.year())
            .step_by(step as usize)
            .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .filter(|d| *d >= a && *d <= b)
            .collect()
    }
}

/// Days since 0001-01-01 (CE), as used for dates on continuous axes.
pub fn day_number(date: NaiveDate) -> Value {
    date.num_days_from_ce() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_inverts_for_y_axis() {
        let y = LinearScale::new((0.0, 100.0), (300.0, 0.0));
        assert_eq!(y.to_px(0.0), 300.0);
        assert_eq!(y.to_px(100.0), 0.0);
        assert!((y.from_px(150.0) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn band_centers_are_ordered_and_padded() {
        let cats = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let b = BandScale::new(cats, (0.0, 310.0), 0.1);
        let (a, c) = (b.center("a").unwrap(), b.center("c").unwrap());
        assert!(a > 0.0 && c < 310.0 && a < c);
        assert!(b.position("b").unwrap() > b.position("a").unwrap() + b.bandwidth());
        assert!(b.center("zzz").is_none());
    }
}
