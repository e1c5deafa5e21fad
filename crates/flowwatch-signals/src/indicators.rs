//! Rolling-window indicator primitives.

/// Simple mean of the last `period` values (or all values if fewer).
/// `None` for empty input or a zero period.
pub fn trailing_mean(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() || period == 0 {
        return None;
    }
    let window = &values[values.len().saturating_sub(period)..];
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Relative Strength Index of the latest observation, using simple (not
/// exponential) rolling means of gains and losses over `period` entries.
///
/// The delta series is aligned with `closes`, so its first entry has no
/// predecessor and counts as a zero move. Returns `None` when fewer than
/// `period` closes are available.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let start = closes.len() - period;
    let (gain_sum, loss_sum) = (start..closes.len()).fold((0.0, 0.0), |(gain, loss), i| {
        let delta = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        if delta > 0.0 {
            (gain + delta, loss)
        } else {
            (gain, loss - delta)
        }
    });

    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;

    Some(if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_mean_uses_available_history() {
        assert_eq!(trailing_mean(&[1.0, 2.0, 3.0], 20), Some(2.0));
        assert_eq!(trailing_mean(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
        assert_eq!(trailing_mean(&[], 20), None);
    }

    #[test]
    fn rsi_needs_full_window() {
        let closes: Vec<f64> = (0..13).map(f64::from).collect();
        assert_eq!(rsi(&closes, 14), None);
    }

    #[test]
    fn rsi_of_monotonic_series_hits_extremes() {
        let rising: Vec<f64> = (0..20).map(f64::from).collect();
        assert_eq!(rsi(&rising, 14), Some(100.0));
        let falling: Vec<f64> = (0..20).rev().map(f64::from).collect();
        assert_eq!(rsi(&falling, 14), Some(0.0));
        assert_eq!(rsi(&[5.0; 20], 14), Some(50.0));
    }

    #[test]
    fn rsi_balances_gains_and_losses() {
        // Alternating +2 / -1 moves over the last 14 deltas: 7 gains of 2, 7 losses of 1.
        let mut closes = vec![100.0];
        for i in 0..20 {
            let last = closes[closes.len() - 1];
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        let value = rsi(&closes, 14).expect("enough history");
        assert!((value - 100.0 * 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn first_window_counts_leading_zero_move() {
        // Exactly `period` closes: 13 real deltas plus a zero for the first bar.
        let closes = [10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0];
        let value = rsi(&closes, 14).expect("enough history");
        // 7 gains of 1, 6 losses of 1.
        assert!((value - 100.0 * 7.0 / 13.0).abs() < 1e-9);
    }
}
