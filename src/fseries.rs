/*
 * // Copyright (c) Radzivon Bartoshyk 10/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::err::{try_vec, NufftError};
use crate::kernel::{evaluate_kernel, SpreadParams};
use crate::quad::gauss_legendre;
use crate::NufftSample;
use num_traits::AsPrimitive;
use std::f64::consts::PI;

/// Quadrature nodes scaled to the kernel half-support together with
/// their weighted kernel samples `w_n * phi(z_n)`.
fn weighted_kernel_nodes(q_half: usize, params: &SpreadParams) -> (Vec<f64>, Vec<f64>) {
    let half_support = params.nspread as f64 / 2.0;
    let (z, w) = gauss_legendre(2 * q_half);
    let nodes: Vec<f64> = z.iter().map(|&z| z * half_support).collect();
    let samples: Vec<f64> = nodes
        .iter()
        .zip(w.iter())
        .map(|(&z, &w)| half_support * w * evaluate_kernel(z, params))
        .collect();
    (nodes, samples)
}

/// Fourier-series coefficients of the periodised kernel on a uniform
/// length-`nf` grid, for frequencies `0 ..= nf/2`.
///
/// By evenness of the kernel each coefficient is the cosine sum over
/// the quadrature nodes; the values are real, positive and strictly
/// decreasing in frequency.
pub(crate) fn fseries_kernel<T: NufftSample>(
    nf: u64,
    params: &SpreadParams,
) -> Result<Vec<T>, NufftError>
where
    f64: AsPrimitive<T>,
{
    let q_half = 2 + (3 * params.nspread) / 2;
    let (nodes, samples) = weighted_kernel_nodes(q_half, params);
    let nout = (nf / 2 + 1) as usize;
    let mut out = try_vec![T::zero(); nout];
    let step = 2.0 * PI / nf as f64;
    for (k, dst) in out.iter_mut().enumerate() {
        let mut acc = 0.0f64;
        for (&z, &f) in nodes.iter().zip(samples.iter()) {
            acc += f * (k as f64 * step * z).cos();
        }
        *dst = acc.as_();
    }
    Ok(out)
}

/// Continuous Fourier transform of the scaled kernel at the arbitrary
/// frequencies `s` (type-3 post-correction).
pub(crate) fn nuft_kernel<T: NufftSample>(
    s: &[T],
    params: &SpreadParams,
) -> Result<Vec<T>, NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let q_half = 2 + params.nspread;
    let (nodes, samples) = weighted_kernel_nodes(q_half, params);
    let mut out = try_vec![T::zero(); s.len()];
    for (dst, &sk) in out.iter_mut().zip(s.iter()) {
        let sk: f64 = sk.as_();
        let mut acc = 0.0f64;
        for (&z, &f) in nodes.iter().zip(samples.iter()) {
            acc += f * (sk * z).cos();
        }
        *dst = acc.as_();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::setup_spreader;

    fn fser_reference(nf: u64, k: u64, params: &SpreadParams) -> f64 {
        // dense trapezoid integration of phi(z) cos(2 pi k z / nf)
        let hw = params.nspread as f64 / 2.0;
        let steps = 200_000usize;
        let dz = 2.0 * hw / steps as f64;
        let mut acc = 0.0;
        for i in 0..=steps {
            let z = -hw + i as f64 * dz;
            let weight = if i == 0 || i == steps { 0.5 } else { 1.0 };
            let phi: f64 = evaluate_kernel(z, params);
            acc += weight * phi * (2.0 * PI * k as f64 * z / nf as f64).cos() * dz;
        }
        acc
    }

    #[test]
    fn fseries_matches_dense_quadrature() {
        let params = setup_spreader(1e-6, 2.0).unwrap();
        let nf = 64;
        let table: Vec<f64> = fseries_kernel(nf, &params).unwrap();
        assert_eq!(table.len(), 33);
        for k in [0u64, 1, 5, 17, 32] {
            let reference = fser_reference(nf, k, &params);
            let got = table[k as usize];
            assert!(
                (got - reference).abs() < 1e-6 * table[0],
                "k={k}: {got} vs {reference}"
            );
        }
    }

    #[test]
    fn fseries_is_positive_and_decreasing() {
        let params = setup_spreader(1e-9, 2.0).unwrap();
        let table: Vec<f64> = fseries_kernel(120, &params).unwrap();
        assert!(table[0] > 0.0);
        for pair in table.windows(2) {
            assert!(pair[1] > 0.0);
            assert!(pair[1] < pair[0], "table not decreasing: {pair:?}");
        }
    }

    #[test]
    fn nuft_agrees_with_fseries_at_grid_frequencies() {
        // at s = 2 pi k / nf the continuous transform equals the
        // series coefficient of the periodised kernel
        let params = setup_spreader(1e-8, 2.0).unwrap();
        let nf = 90u64;
        let table: Vec<f64> = fseries_kernel(nf, &params).unwrap();
        let s: Vec<f64> = (0..=8).map(|k| 2.0 * PI * k as f64 / nf as f64).collect();
        let nuft: Vec<f64> = nuft_kernel(&s, &params).unwrap();
        for (k, (&a, &b)) in nuft.iter().zip(table.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-6 * table[0],
                "k={k}: nuft {a} vs fser {b}"
            );
        }
    }
}
