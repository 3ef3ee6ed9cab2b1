/// Width in cells of each distribution bar, scaled so the largest bucket fills `max_width`.
///
/// Non-empty buckets always get at least one cell so the count has something to sit on.
pub fn bar_widths(distribution: &[u32], max_width: u16) -> Vec<u16> {
    let highest = distribution.iter().copied().max().unwrap_or(0);
    if highest == 0 || max_width == 0 {
        return vec![0; distribution.len()];
    }

    distribution
        .iter()
        .map(|&count| {
            if count == 0 {
                0
            } else {
                let scaled = (count as f64 / highest as f64 * max_width as f64).round() as u16;
                scaled.clamp(1, max_width)
            }
        })
        .collect()
}

/// Mean number of guesses over won games; bucket `i` holds wins on guess `i + 1`
pub fn mean_guesses(distribution: &[u32]) -> Option<f64> {
    let wins: u32 = distribution.iter().sum();
    if wins == 0 {
        return None;
    }
    let total: u64 = distribution
        .iter()
        .enumerate()
        .map(|(i, &count)| (i as u64 + 1) * count as u64)
        .sum();
    Some(total as f64 / wins as f64)
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
