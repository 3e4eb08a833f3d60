// File: crates/storyline-core/src/grid.rs
// Summary: Simple grid/tick layout helpers.

/// Round-number tick step (1, 2, 5 times a power of ten) for roughly `count` intervals.
pub fn nice_step(span: f64, count: usize) -> f64 {
    let raw = span.abs().max(1e-12) / count.max(1) as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 { 1.0 } else if norm <= 2.0 { 2.0 } else if norm <= 5.0 { 5.0 } else { 10.0 };
    nice * mag
}

/// Tick values covering `[min, max]` on multiples of [`nice_step`].
pub fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return vec![min];
    }
    let step = nice_step(max - min, count);
    let first = (min / step).ceil() * step;
    let mut out = Vec::new();
    let mut v = first;
    while v <= max + step * 1e-9 {
        // snap float noise like 0.30000000000000004
        out.push((v / step).round() * step);
        v += step;
    }
    out
}

/// Upper domain bound rounded up to the next tick, so bars never touch the top edge.
pub fn nice_max(max: f64, count: usize) -> f64 {
    if max <= 0.0 { return 1.0; }
    let step = nice_step(max, count);
    (max / step).ceil() * step
}

/// Format a tick value compactly: integers without decimals, otherwise one decimal.
pub fn format_tick(v: f64, suffix: &str) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}{}", v.round() as i64, suffix)
    } else {
        format!("{:.1}{}", v, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_land_on_round_numbers() {
        assert_eq!(nice_ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_max(905.0, 5), 1000.0);
        assert_eq!(format_tick(20.0, " GW"), "20 GW");
        assert_eq!(format_tick(2.46, ""), "2.5");
    }
}
