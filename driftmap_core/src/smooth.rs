//! Isotropic Gaussian smoothing for density matrices.
//!
//! Operates in grid-index space, not geographic distance: the same sigma
//! blurs a fixed number of grid cells regardless of the axis spacing, so a
//! higher grid resolution yields a narrower geographic blur. The density
//! engine depends on this coupling.

use nalgebra::DMatrix;

/// Kernel support in standard deviations on each side.
const TRUNCATE: f64 = 4.0;

/// Applies an isotropic Gaussian blur with the given standard deviation.
///
/// Separable implementation: one 1-D pass along rows, one along columns,
/// with reflect boundary handling. `sigma <= 0` is the identity.
pub fn gaussian_smooth(matrix: &DMatrix<f64>, sigma: f64) -> DMatrix<f64> {
    if sigma <= 0.0 || matrix.is_empty() {
        return matrix.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let horizontal = convolve_rows(matrix, &kernel);
    let transposed = horizontal.transpose();
    convolve_rows(&transposed, &kernel).transpose()
}

/// Normalized 1-D Gaussian kernel truncated at `TRUNCATE * sigma`.
fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as usize;
    let mut kernel = Vec::with_capacity(2 * radius + 1);

    for i in -(radius as i64)..=(radius as i64) {
        let x = i as f64 / sigma;
        kernel.push((-0.5 * x * x).exp());
    }

    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Convolves every row with the kernel, reflecting at both ends.
fn convolve_rows(matrix: &DMatrix<f64>, kernel: &[f64]) -> DMatrix<f64> {
    let (rows, cols) = matrix.shape();
    let radius = (kernel.len() / 2) as i64;
    let mut out = DMatrix::zeros(rows, cols);

    for r in 0..rows {
        for c in 0..cols {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let idx = reflect(c as i64 + k as i64 - radius, cols);
                acc += w * matrix[(r, idx)];
            }
            out[(r, c)] = acc;
        }
    }

    out
}

/// Maps an out-of-range index back into [0, n) by mirroring at the edges
/// (the `d c b a | a b c d | d c b a` convention).
fn reflect(idx: i64, n: usize) -> usize {
    let period = 2 * n as i64;
    let mut i = idx.rem_euclid(period);
    if i >= n as i64 {
        i = period - 1 - i;
    }
    i as usize
}
