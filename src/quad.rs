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
use std::f64::consts::PI;

/// Legendre polynomial `P_n` and its derivative at `z`, by the
/// three-term recurrence.
#[inline]
fn legendre_pair(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 0..n {
        let p3 = p2;
        p2 = p1;
        p1 = ((2.0 * j as f64 + 1.0) * z * p2 - j as f64 * p3) / (j as f64 + 1.0);
    }
    let dp = n as f64 * (z * p1 - p2) / (z * z - 1.0);
    (p1, dp)
}

/// Gauss-Legendre nodes and weights on [-1, 1], ascending node order.
///
/// Roots are located by Newton iteration from the Chebyshev estimate;
/// the rule is exact for polynomials of degree `2n - 1` and the
/// construction is deterministic.
pub(crate) fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0f64; n];
    let mut weights = vec![0.0f64; n];
    let half = n.div_ceil(2);
    for i in 0..half {
        let mut z = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_pair(n, z);
            let z1 = z;
            z -= p / dp;
            if (z - z1).abs() < 1e-14 {
                break;
            }
        }
        let (_, dp) = legendre_pair(n, z);
        let w = 2.0 / ((1.0 - z * z) * dp * dp);
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    (nodes, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrate(n: usize, f: impl Fn(f64) -> f64) -> f64 {
        let (z, w) = gauss_legendre(n);
        z.iter().zip(w.iter()).map(|(&z, &w)| w * f(z)).sum()
    }

    #[test]
    fn weights_sum_to_interval_length() {
        for n in [1usize, 2, 5, 16, 27, 40] {
            let total = integrate(n, |_| 1.0);
            assert!((total - 2.0).abs() < 1e-13, "sum {total} for n={n}");
        }
    }

    #[test]
    fn exact_on_low_degree_polynomials() {
        // int x^2 = 2/3, int x^4 = 2/5, int x^6 = 2/7
        for (pow, exact) in [(2u32, 2.0 / 3.0), (4, 2.0 / 5.0), (6, 2.0 / 7.0)] {
            let got = integrate(8, |x| x.powi(pow as i32));
            assert!((got - exact).abs() < 1e-13, "x^{pow}: {got} != {exact}");
        }
        // odd powers vanish by symmetry
        assert!(integrate(8, |x| x.powi(5)).abs() < 1e-14);
    }

    #[test]
    fn resolves_a_smooth_exponential() {
        // int_{-1}^{1} e^x dx = e - 1/e
        let exact = std::f64::consts::E - 1.0 / std::f64::consts::E;
        let got = integrate(12, f64::exp);
        assert!((got - exact).abs() < 1e-13);
    }

    #[test]
    fn nodes_are_sorted_and_interior() {
        let (z, _) = gauss_legendre(17);
        for pair in z.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(z[0] > -1.0 && z[16] < 1.0);
    }
}
