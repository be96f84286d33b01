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

/// Largest admissible `nf1 * nf2` for the oversampled working grid;
/// requests beyond it are rejected before any allocation is attempted.
pub const MAX_NF: u64 = 100_000_000_000;

/// Smallest even integer `>= n` whose odd part factors into {3, 5},
/// keeping every grid length friendly to a small-prime FFT.
pub(crate) fn next235even(n: u64) -> u64 {
    if n <= 2 {
        return 2;
    }
    let mut candidate = if n.is_multiple_of(2) { n } else { n + 1 };
    loop {
        let mut rest = candidate;
        while rest.is_multiple_of(2) {
            rest /= 2;
        }
        while rest.is_multiple_of(3) {
            rest /= 3;
        }
        while rest.is_multiple_of(5) {
            rest /= 5;
        }
        if rest == 1 {
            return candidate;
        }
        candidate += 2;
    }
}

/// Oversampled grid length for a type-1/2 axis of `m` requested modes.
///
/// The result is at least `2 * nspread` so the periodic spreading
/// window never overlaps itself.
pub(crate) fn set_nf_type12(m: usize, upsampfac: f64, nspread: usize) -> u64 {
    let mut nf = (upsampfac * m as f64) as u64;
    if nf < 2 * nspread as u64 {
        nf = 2 * nspread as u64;
    }
    if nf < MAX_NF {
        nf = next235even(nf);
    }
    nf
}

/// Type-3 axis sizing: grid length `nf`, grid spacing `h` and the
/// coordinate rescale factor `gamma` for a source half-width `x_half`
/// and target-frequency half-width `s_half`.
///
/// Degenerate half-widths are substituted so the space-bandwidth
/// product stays at least one.
pub(crate) fn set_nhg_type3(
    s_half: f64,
    x_half: f64,
    upsampfac: f64,
    nspread: usize,
) -> (u64, f64, f64) {
    let nss = nspread + 1;
    let mut x_safe = x_half;
    let mut s_safe = s_half;
    if x_half == 0.0 {
        if s_half == 0.0 {
            x_safe = 1.0;
            s_safe = 1.0;
        } else {
            x_safe = x_safe.max(1.0 / s_half);
        }
    } else {
        s_safe = s_safe.max(1.0 / x_half);
    }

    let mut nfd = 2.0 * upsampfac * s_safe * x_safe / PI + nss as f64;
    if !nfd.is_finite() {
        nfd = 0.0;
    }
    let mut nf = nfd as u64;
    if nf < 2 * nspread as u64 {
        nf = 2 * nspread as u64;
    }
    if nf < MAX_NF {
        nf = next235even(nf);
    }
    let h = 2.0 * PI / nf as f64;
    let gamma = nf as f64 / (2.0 * upsampfac * s_safe);
    (nf, h, gamma)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_235_smooth(mut n: u64) -> bool {
        for p in [2u64, 3, 5] {
            while n.is_multiple_of(p) {
                n /= p;
            }
        }
        n == 1
    }

    #[test]
    fn next235even_known_values() {
        assert_eq!(next235even(1), 2);
        assert_eq!(next235even(2), 2);
        assert_eq!(next235even(3), 4);
        assert_eq!(next235even(7), 8);
        assert_eq!(next235even(11), 12);
        assert_eq!(next235even(120), 120);
        assert_eq!(next235even(121), 128);
        assert_eq!(next235even(481), 486);
    }

    #[test]
    fn next235even_is_even_smooth_and_minimal_step() {
        for n in 2..2000u64 {
            let nf = next235even(n);
            assert!(nf >= n);
            assert!(nf.is_multiple_of(2), "{nf} not even");
            assert!(is_235_smooth(nf), "{nf} not 2,3,5-smooth");
        }
    }

    #[test]
    fn type12_sizing_respects_floors() {
        // sigma * m dominates for reasonable mode counts
        let nf = set_nf_type12(100, 2.0, 7);
        assert!(nf >= 200 && is_235_smooth(nf));
        // the kernel-width floor dominates for tiny mode counts
        assert_eq!(set_nf_type12(1, 2.0, 7), next235even(14));
        assert_eq!(set_nf_type12(2, 2.0, 10), 20);
    }

    #[test]
    fn type3_sizing_admits_both_widths() {
        let ns = 10;
        for (s, x) in [(20.0, 3.0), (5.0, 2.0), (250.0, 0.1)] {
            let (nf, h, gamma) = set_nhg_type3(s, x, 2.0, ns);
            assert!(nf > 2 * ns as u64);
            assert!(is_235_smooth(nf));
            assert!((h - 2.0 * PI / nf as f64).abs() < 1e-15);
            // rescaled sources and frequencies both fit inside the
            // central spreadable band
            let margin = PI * (1.0 - ns as f64 / nf as f64);
            assert!(x / gamma < margin, "sources escape for S={s} X={x}");
            assert!(h * gamma * s < margin, "frequencies escape for S={s} X={x}");
        }
    }

    #[test]
    fn type3_degenerate_widths_are_substituted() {
        let (nf, _, gamma) = set_nhg_type3(0.0, 0.0, 2.0, 7);
        assert!(nf >= 14);
        assert!(gamma.is_finite() && gamma > 0.0);
        let (nf, _, _) = set_nhg_type3(0.0, 5.0, 2.0, 7);
        assert!(nf >= 14);
    }
}
