/// Recursive ("adjust-free") exponential moving average.
///
/// `EMA[0] = close[0]`, then `EMA[i] = α·close[i] + (1 − α)·EMA[i − 1]` with
/// `α = 2 / (period + 1)`. Early values are never re-weighted.
pub fn ema(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(closes.len());
    let Some(&first) = closes.first() else {
        return out;
    };

    let alpha = smoothing(period);
    let mut prev = first;
    out.push(prev);
    for &close in &closes[1..] {
        // Same recursion, written so a flat series stays exactly flat.
        prev += alpha * (close - prev);
        out.push(prev);
    }
    out
}

pub fn smoothing(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}
