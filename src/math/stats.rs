//! Pearson correlation, histogram binning, and a Gaussian KDE.
//!
//! Small, pure, and self-contained; the chart renderer is the only consumer.

/// Pearson linear correlation of two equal-length samples.
///
/// Returns 0 for degenerate input (fewer than two points, or zero variance
/// on either side) so the rendered matrix stays finite.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }

    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Pairwise correlation matrix; the diagonal is 1 by definition.
pub fn correlation_matrix(columns: &[&[f64]]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut out = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in 0..k {
            out[i][j] = if i == j { 1.0 } else { pearson(columns[i], columns[j]) };
        }
    }
    out
}

/// Equal-width histogram.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    /// `bins + 1` edges, ascending.
    pub edges: Vec<f64>,
    /// Count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        if self.edges.len() < 2 {
            return 0.0;
        }
        self.edges[1] - self.edges[0]
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin `values` into `bins` equal-width buckets over `[min, max]`.
///
/// Non-finite values are ignored. A constant sample lands in one bucket
/// spanning a unit-width window around the value.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let bins = bins.max(1);
    if finite.is_empty() {
        return Histogram::default();
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in &finite {
        min = min.min(v);
        max = max.max(v);
    }
    if max <= min {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in &finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let edges = (0..=bins).map(|i| min + i as f64 * width).collect();
    Histogram { edges, counts }
}

/// Gaussian kernel density estimate evaluated on a uniform grid over the
/// sample range. Bandwidth follows Scott's rule with a small floor.
///
/// Returns `(x, density)` pairs; empty for fewer than two finite points.
pub fn gaussian_kde(values: &[f64], grid: usize) -> Vec<(f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n < 2 || grid < 2 {
        return Vec::new();
    }

    let mean = finite.iter().sum::<f64>() / n as f64;
    let var = finite.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n as f64 - 1.0);
    let sigma = var.sqrt();

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in &finite {
        min = min.min(v);
        max = max.max(v);
    }
    if max <= min {
        return Vec::new();
    }

    let h = (sigma * (n as f64).powf(-0.2)).max((max - min) * 1e-3);
    let norm = 1.0 / (n as f64 * h * (2.0 * std::f64::consts::PI).sqrt());

    (0..grid)
        .map(|i| {
            let x = min + (max - min) * i as f64 / (grid as f64 - 1.0);
            let density = finite
                .iter()
                .map(|&v| {
                    let z = (x - v) / h;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}
