pub const DEFAULT_RSI_WINDOW: usize = 14;

/// Neutral reading used when the window saw neither gains nor losses.
pub const FLAT_RSI: f64 = 50.0;

/// Compute a Wilder-smoothed RSI series aligned with `closes`.
///
/// Indices before `window` are `None`. Both smoothed averages start at zero
/// and every price change is blended in at weight `1 / window`.
pub fn compute_rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut rsi = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return rsi;
    }

    let alpha = 1.0 / window as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for idx in 1..closes.len() {
        let delta = closes[idx] - closes[idx - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (1.0 - alpha) * avg_gain + alpha * gain;
        avg_loss = (1.0 - alpha) * avg_loss + alpha * loss;

        if idx >= window {
            rsi[idx] = Some(rsi_from_averages(avg_gain, avg_loss));
        }
    }

    rsi
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { FLAT_RSI } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 8.0 + (i % 5) as f64)
            .collect()
    }

    #[test]
    fn warm_up_region_is_undefined() {
        let rsi = compute_rsi(&zigzag(40), DEFAULT_RSI_WINDOW);
        assert_eq!(rsi.len(), 40);
        assert!(rsi[..DEFAULT_RSI_WINDOW].iter().all(Option::is_none));
        assert!(rsi[DEFAULT_RSI_WINDOW..].iter().all(Option::is_some));
    }

    #[test]
    fn short_series_is_entirely_undefined() {
        for len in 0..=DEFAULT_RSI_WINDOW {
            let rsi = compute_rsi(&zigzag(len), DEFAULT_RSI_WINDOW);
            assert_eq!(rsi.len(), len);
            assert!(rsi.iter().all(Option::is_none), "len {len}");
        }
    }

    #[test]
    fn defined_values_stay_within_bounds() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 50.0 + ((i * 37) % 101) as f64 * 0.9)
            .collect();
        let rsi = compute_rsi(&closes, DEFAULT_RSI_WINDOW);
        for value in rsi.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "rsi {value} out of range");
        }
    }

    #[test]
    fn only_gains_read_one_hundred() {
        let closes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let rsi = compute_rsi(&closes, DEFAULT_RSI_WINDOW);
        assert_eq!(rsi[DEFAULT_RSI_WINDOW], Some(100.0));
        assert_eq!(rsi[19], Some(100.0));
    }

    #[test]
    fn only_losses_read_zero() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let rsi = compute_rsi(&closes, DEFAULT_RSI_WINDOW);
        assert_eq!(rsi[19], Some(0.0));
    }

    #[test]
    fn flat_prices_read_neutral() {
        let rsi = compute_rsi(&[42.0; 30], DEFAULT_RSI_WINDOW);
        assert!(rsi[DEFAULT_RSI_WINDOW..]
            .iter()
            .all(|value| *value == Some(FLAT_RSI)));
    }

    #[test]
    fn single_drop_after_rally_matches_hand_computation() {
        // 14 gains of +1, then a 60 point drop.
        let mut closes: Vec<f64> = (146..=160).map(f64::from).collect();
        closes.push(100.0);
        let rsi = compute_rsi(&closes, DEFAULT_RSI_WINDOW);

        let alpha: f64 = 1.0 / 14.0;
        let avg_gain = (1.0 - alpha) * (1.0 - (1.0 - alpha).powi(14));
        let avg_loss = alpha * 60.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        let actual = rsi[15].unwrap();
        assert!((actual - expected).abs() < 1e-9);
        assert!(actual < 20.0);
    }

    #[test]
    fn large_first_change_is_damped_by_zero_start() {
        let mut closes = vec![100.0, 150.0];
        closes.extend((1..=13).map(|k| 150.0 - k as f64));
        let rsi = compute_rsi(&closes, DEFAULT_RSI_WINDOW);

        let alpha = 1.0 / 14.0;
        let (mut avg_gain, mut avg_loss) = (0.0, 0.0);
        for pair in closes.windows(2) {
            let delta: f64 = pair[1] - pair[0];
            avg_gain = (1.0 - alpha) * avg_gain + alpha * delta.max(0.0);
            avg_loss = (1.0 - alpha) * avg_loss + alpha * (-delta).max(0.0);
        }
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);

        let actual = rsi[14].unwrap();
        assert!((actual - expected).abs() < 1e-9);
        assert!(actual < 70.0, "rsi {actual} should stay below the overbought line");
    }

    #[test]
    fn zero_window_yields_nothing() {
        let rsi = compute_rsi(&zigzag(10), 0);
        assert!(rsi.iter().all(Option::is_none));
    }
}
