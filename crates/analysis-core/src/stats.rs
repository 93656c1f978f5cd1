//! Small numeric helpers shared by the analysis engines.

/// Trading days per year, used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Simple daily returns (percent change). The first, undefined entry is
/// dropped, so the result is one shorter than the input.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator, matching the convention of
/// the reference data tooling).
pub fn stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Pearson correlation coefficient over paired samples. Returns 0.0 when
/// either series is degenerate or the inputs are too short to correlate.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let xs = &xs[..n];
    let ys = &ys[..n];
    let mx = mean(xs);
    let my = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mx;
        let dy = ys[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Annualized volatility from daily returns: stdev × sqrt(252).
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    stdev(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Round to two decimal places, the precision of every impact, confidence
/// and price figure on the wire.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_returns_drops_first_entry() {
        let closes = vec![100.0, 102.0, 101.0];
        let returns = daily_returns(&closes);

        assert_eq!(returns.len(), 2);
        assert!((returns[0] - 0.02).abs() < 1e-12);
        assert!((returns[1] - (-1.0 / 102.0)).abs() < 1e-12);
    }

    #[test]
    fn test_stdev_sample_convention() {
        // Sample stdev of [2, 4, 4, 4, 5, 5, 7, 9] is sqrt(32/7).
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((stdev(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_stdev_short_input() {
        assert_eq!(stdev(&[1.0]), 0.0);
        assert_eq!(stdev(&[]), 0.0);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let ys = vec![2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);

        let inverse: Vec<f64> = ys.iter().map(|y| -y).collect();
        assert!((pearson(&xs, &inverse) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_series() {
        let flat = vec![3.0, 3.0, 3.0];
        let moving = vec![1.0, 2.0, 3.0];
        assert_eq!(pearson(&flat, &moving), 0.0);
    }

    #[test]
    fn test_annualized_volatility() {
        let returns = vec![0.01, -0.02, 0.015, 0.005];
        let expected = stdev(&returns) * 252.0f64.sqrt();
        assert!((annualized_volatility(&returns) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(1.0), 1.0);
    }
}
