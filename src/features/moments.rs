//! Hu moment invariants.
//!
//! Moments use the row index as the first coordinate: `mu[p][q]` weights
//! pixels by `(r - r̄)^p (c - c̄)^q`.

use ndarray::ArrayView2;

/// Number of Hu invariants.
pub const HU_MOMENTS: usize = 7;

/// Computes the seven Hu invariants of an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentExtractor;

impl MomentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the invariants in canonical order.
    ///
    /// An image with zero total mass has no centroid and yields zeros.
    pub fn extract(&self, image: ArrayView2<'_, f64>) -> [f64; HU_MOMENTS] {
        match normalized_moments(image) {
            Some(nu) => hu_invariants(&nu),
            None => [0.0; HU_MOMENTS],
        }
    }
}

/// Scale-normalized central moments up to order 3.
fn normalized_moments(image: ArrayView2<'_, f64>) -> Option<[[f64; 4]; 4]> {
    let mut m00 = 0.0;
    let mut m10 = 0.0;
    let mut m01 = 0.0;
    for ((r, c), &v) in image.indexed_iter() {
        m00 += v;
        m10 += r as f64 * v;
        m01 += c as f64 * v;
    }
    if m00 == 0.0 {
        return None;
    }
    let (r_bar, c_bar) = (m10 / m00, m01 / m00);

    let mut mu = [[0.0; 4]; 4];
    for ((r, c), &v) in image.indexed_iter() {
        if v == 0.0 {
            continue;
        }
        let dr = r as f64 - r_bar;
        let dc = c as f64 - c_bar;
        let mut row_pow = 1.0;
        for p in 0..4 {
            let mut col_pow = 1.0;
            for q in 0..4 - p {
                mu[p][q] += row_pow * col_pow * v;
                col_pow *= dc;
            }
            row_pow *= dr;
        }
    }

    let mut nu = [[0.0; 4]; 4];
    for p in 0..4 {
        for q in 0..4 - p {
            if p + q >= 2 {
                let exponent = (p + q) as f64 / 2.0 + 1.0;
                nu[p][q] = mu[p][q] / m00.powf(exponent);
            }
        }
    }
    Some(nu)
}

fn hu_invariants(nu: &[[f64; 4]; 4]) -> [f64; HU_MOMENTS] {
    let (n20, n02, n11) = (nu[2][0], nu[0][2], nu[1][1]);
    let (n30, n03, n21, n12) = (nu[3][0], nu[0][3], nu[2][1], nu[1][2]);

    let a = n30 + n12;
    let b = n21 + n03;
    let c = n30 - 3.0 * n12;
    let d = 3.0 * n21 - n03;

    [
        n20 + n02,
        (n20 - n02).powi(2) + 4.0 * n11 * n11,
        c * c + d * d,
        a * a + b * b,
        c * a * (a * a - 3.0 * b * b) + d * b * (3.0 * a * a - b * b),
        (n20 - n02) * (a * a - b * b) + 4.0 * n11 * a * b,
        d * a * (a * a - 3.0 * b * b) - c * b * (3.0 * a * a - b * b),
    ]
}
