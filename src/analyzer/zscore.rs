/// Sample standard deviation (n − 1) of the last `window` values, or `None`
/// when there are fewer than `window` values, the window is shorter than 2,
/// or the result is not a positive finite number.
pub fn rolling_std_last(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    let n = window as f64;
    let mean = tail.iter().sum::<f64>() / n;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = variance.sqrt();
    (std.is_finite() && std > 0.0).then_some(std)
}

/// Z-score of `close − ema` at the final sample, normalised by the rolling
/// standard deviation of that deviation.
pub fn z_score_last(closes: &[f64], ema: &[f64], window: usize) -> Option<f64> {
    let deviation: Vec<f64> = closes.iter().zip(ema).map(|(c, e)| c - e).collect();
    let last = *deviation.last()?;
    let std = rolling_std_last(&deviation, window)?;
    let z = last / std;
    z.is_finite().then_some(z)
}
