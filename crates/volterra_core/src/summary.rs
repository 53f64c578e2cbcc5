use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A local extremum of a sampled series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Extremum {
    pub time: f64,
    pub value: f64,
}

/// Oscillation statistics for one population series: the local extrema,
/// the global peak and trough, and the mean spacing between successive
/// local maxima as an oscillation-period estimate. This is what the
/// guided questions in the dashboard ask about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub maxima: Vec<Extremum>,
    pub minima: Vec<Extremum>,
    pub peak_value: f64,
    pub trough_value: f64,
    pub period_estimate: Option<f64>,
}

/// Scans a sampled series for strict interior local extrema.
///
/// The series is expected to be densely sampled, so comparing immediate
/// neighbors is enough; there is no smoothing or plateau handling. The
/// period estimate is `None` when fewer than two local maxima exist.
pub fn summarize_series(time: &[f64], values: &[f64]) -> Result<SeriesSummary> {
    if time.len() != values.len() {
        bail!(
            "time and value lengths differ: {} vs {}",
            time.len(),
            values.len()
        );
    }
    if time.len() < 3 {
        bail!("series too short to summarize: {} samples", time.len());
    }
    if values.iter().any(|v| !v.is_finite()) {
        bail!("series contains non-finite values");
    }

    let mut maxima = Vec::new();
    let mut minima = Vec::new();
    for i in 1..values.len() - 1 {
        let (prev, here, next) = (values[i - 1], values[i], values[i + 1]);
        if here > prev && here > next {
            maxima.push(Extremum {
                time: time[i],
                value: here,
            });
        } else if here < prev && here < next {
            minima.push(Extremum {
                time: time[i],
                value: here,
            });
        }
    }

    let peak_value = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let trough_value = values.iter().copied().fold(f64::INFINITY, f64::min);

    let period_estimate = if maxima.len() >= 2 {
        let total: f64 = maxima
            .windows(2)
            .map(|pair| pair[1].time - pair[0].time)
            .sum();
        Some(total / (maxima.len() - 1) as f64)
    } else {
        None
    };

    Ok(SeriesSummary {
        maxima,
        minima,
        peak_value,
        trough_value,
        period_estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::summarize_series;

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn recovers_the_period_of_a_sine_wave() {
        let n = 5000;
        let t_end = 25.0;
        let time: Vec<f64> = (0..n).map(|i| t_end * i as f64 / (n - 1) as f64).collect();
        let values: Vec<f64> = time.iter().map(|t| 3.0 + t.sin()).collect();

        let summary = summarize_series(&time, &values).expect("summary should compute");
        // sin peaks at π/2 + 2πk; four fit inside [0, 25].
        assert_eq!(summary.maxima.len(), 4);
        assert_eq!(summary.minima.len(), 4);
        let period = summary.period_estimate.expect("four maxima give a period");
        assert!((period - std::f64::consts::TAU).abs() < 0.05);
        assert!((summary.peak_value - 4.0).abs() < 1e-3);
        assert!((summary.trough_value - 2.0).abs() < 1e-3);
    }

    #[test]
    fn monotonic_series_has_no_extrema_or_period() {
        let time: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let values: Vec<f64> = time.iter().map(|t| t * 2.0).collect();
        let summary = summarize_series(&time, &values).expect("summary should compute");
        assert!(summary.maxima.is_empty());
        assert!(summary.minima.is_empty());
        assert!(summary.period_estimate.is_none());
    }

    #[test]
    fn flat_series_has_no_extrema() {
        let time: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let values = vec![1.5; 100];
        let summary = summarize_series(&time, &values).expect("summary should compute");
        assert!(summary.maxima.is_empty());
        assert!(summary.minima.is_empty());
    }

    #[test]
    fn rejects_invalid_series() {
        assert_err_contains(summarize_series(&[0.0, 1.0], &[1.0]), "lengths differ");
        assert_err_contains(summarize_series(&[0.0, 1.0], &[1.0, 2.0]), "too short");
        assert_err_contains(
            summarize_series(&[0.0, 1.0, 2.0], &[1.0, f64::NAN, 2.0]),
            "non-finite",
        );
    }
}
