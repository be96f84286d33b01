/*
 * // Copyright (c) Radzivon Bartoshyk 11/2025. All rights reserved.
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
use crate::opts::ModeOrder;
use crate::NufftSample;
use num_complex::Complex;

/// Start offsets of the non-negative and negative mode blocks inside
/// an `m`-long mode axis laid out in `order`.
#[inline]
fn mode_block_offsets(m: usize, order: ModeOrder) -> (usize, usize) {
    let kmin = -(m as i64 / 2);
    let kmax = (m as i64 - 1) / 2;
    match order {
        ModeOrder::Cmcl => ((-kmin) as usize, 0),
        ModeOrder::Fft => (0, (kmax + 1) as usize),
    }
}

/// One row of the type-1 shuffle: divide the grid spectrum by the
/// kernel series and place the centred `ms`-mode block into `fk_row`.
fn deconvolve_row_type1<T: NufftSample>(
    prefac: T,
    ker: &[T],
    ms: usize,
    fk_row: &mut [Complex<T>],
    nf1: usize,
    fw_row: &[Complex<T>],
    order: ModeOrder,
) {
    let kmin = -(ms as i64 / 2);
    let kmax = (ms as i64 - 1) / 2;
    let (mut pp, mut pn) = mode_block_offsets(ms, order);
    for k in 0..=kmax {
        fk_row[pp] = fw_row[k as usize] * (prefac / ker[k as usize]);
        pp += 1;
    }
    for k in kmin..0 {
        fk_row[pn] = fw_row[(nf1 as i64 + k) as usize] * (prefac / ker[(-k) as usize]);
        pn += 1;
    }
}

/// One row of the type-2 shuffle: amplify the `ms`-mode block out of
/// `fk_row` into the grid row, zeroing the pad gap between the
/// positive and negative halves.
fn deconvolve_row_type2<T: NufftSample>(
    prefac: T,
    ker: &[T],
    ms: usize,
    fk_row: &[Complex<T>],
    nf1: usize,
    fw_row: &mut [Complex<T>],
    order: ModeOrder,
) {
    let kmin = -(ms as i64 / 2);
    let kmax = (ms as i64 - 1) / 2;
    let (mut pp, mut pn) = mode_block_offsets(ms, order);
    for k in (kmax + 1)..(nf1 as i64 + kmin) {
        fw_row[k as usize] = Complex::default();
    }
    for k in 0..=kmax {
        fw_row[k as usize] = fk_row[pp] * (prefac / ker[k as usize]);
        pp += 1;
    }
    for k in kmin..0 {
        fw_row[(nf1 as i64 + k) as usize] = fk_row[pn] * (prefac / ker[(-k) as usize]);
        pn += 1;
    }
}

/// Type-1 output stage: every mode `(k1, k2)` of the centred
/// `ms x mt` block becomes
/// `prefac * fw[k1 mod nf1, k2 mod nf2] / (ker1[|k1|] * ker2[|k2|])`,
/// written to `fk` in the `order` layout.
pub(crate) fn deconvolve2d_type1<T: NufftSample>(
    prefac: T,
    ker1: &[T],
    ker2: &[T],
    ms: usize,
    mt: usize,
    fk: &mut [Complex<T>],
    nf1: usize,
    nf2: usize,
    fw: &[Complex<T>],
    order: ModeOrder,
) {
    let k2min = -(mt as i64 / 2);
    let k2max = (mt as i64 - 1) / 2;
    let (pp, pn) = mode_block_offsets(mt, order);
    for k2 in 0..=k2max {
        let fk_row = &mut fk[(pp + k2 as usize) * ms..][..ms];
        let fw_row = &fw[nf1 * k2 as usize..][..nf1];
        deconvolve_row_type1(
            prefac / ker2[k2 as usize],
            ker1,
            ms,
            fk_row,
            nf1,
            fw_row,
            order,
        );
    }
    for (row, k2) in (k2min..0).enumerate() {
        let fk_row = &mut fk[(pn + row) * ms..][..ms];
        let fw_row = &fw[nf1 * (nf2 as i64 + k2) as usize..][..nf1];
        deconvolve_row_type1(
            prefac / ker2[(-k2) as usize],
            ker1,
            ms,
            fk_row,
            nf1,
            fw_row,
            order,
        );
    }
}

/// Type-2 input stage: the inverse shuffle of [deconvolve2d_type1],
/// filling the working grid and zero-padding every cell outside the
/// central mode block.
pub(crate) fn deconvolve2d_type2<T: NufftSample>(
    prefac: T,
    ker1: &[T],
    ker2: &[T],
    ms: usize,
    mt: usize,
    fk: &[Complex<T>],
    nf1: usize,
    nf2: usize,
    fw: &mut [Complex<T>],
    order: ModeOrder,
) {
    let k2min = -(mt as i64 / 2);
    let k2max = (mt as i64 - 1) / 2;
    let (pp, pn) = mode_block_offsets(mt, order);
    // rows touched by neither mode half
    for cell in fw[nf1 * (k2max + 1) as usize..nf1 * (nf2 as i64 + k2min) as usize].iter_mut() {
        *cell = Complex::default();
    }
    for k2 in 0..=k2max {
        let fk_row = &fk[(pp + k2 as usize) * ms..][..ms];
        let fw_row = &mut fw[nf1 * k2 as usize..][..nf1];
        deconvolve_row_type2(
            prefac / ker2[k2 as usize],
            ker1,
            ms,
            fk_row,
            nf1,
            fw_row,
            order,
        );
    }
    for (row, k2) in (k2min..0).enumerate() {
        let fk_row = &fk[(pn + row) * ms..][..ms];
        let fw_row = &mut fw[nf1 * (nf2 as i64 + k2) as usize..][..nf1];
        deconvolve_row_type2(
            prefac / ker2[(-k2) as usize],
            ker1,
            ms,
            fk_row,
            nf1,
            fw_row,
            order,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_kernels(n: usize) -> Vec<f64> {
        vec![1.0; n]
    }

    #[test]
    fn type2_zero_pads_everything_outside_the_block() {
        let (ms, mt, nf1, nf2) = (3usize, 2usize, 8usize, 6usize);
        let fk: Vec<Complex<f64>> = (0..ms * mt)
            .map(|i| Complex::new(1.0 + i as f64, -(i as f64)))
            .collect();
        let mut fw = vec![Complex::new(7.0, 7.0); nf1 * nf2];
        deconvolve2d_type2(
            1.0,
            &flat_kernels(nf1 / 2 + 1),
            &flat_kernels(nf2 / 2 + 1),
            ms,
            mt,
            &fk,
            nf1,
            nf2,
            &mut fw,
            ModeOrder::Cmcl,
        );
        let mut written = 0usize;
        for (idx, v) in fw.iter().enumerate() {
            let (x, y) = (idx % nf1, idx / nf1);
            let in_x = x <= 1 || x == nf1 - 1; // k1 in {-1, 0, 1}
            let in_y = y == 0 || y == nf2 - 1; // k2 in {-1, 0}
            if in_x && in_y {
                written += 1;
            } else {
                assert_eq!(*v, Complex::default(), "cell ({x},{y}) not zeroed");
            }
        }
        assert_eq!(written, ms * mt);
    }

    #[test]
    fn type1_then_type2_layouts_are_inverse_permutations() {
        // with flat kernels the two shuffles move values without
        // scaling, so a round trip through the grid must be exact
        let (ms, mt, nf1, nf2) = (4usize, 5usize, 12usize, 10usize);
        for order in [ModeOrder::Cmcl, ModeOrder::Fft] {
            let fk_in: Vec<Complex<f64>> = (0..ms * mt)
                .map(|i| Complex::new(i as f64 + 0.25, 2.0 * i as f64))
                .collect();
            let mut fw = vec![Complex::new(-3.0, 4.0); nf1 * nf2];
            deconvolve2d_type2(
                1.0,
                &flat_kernels(nf1 / 2 + 1),
                &flat_kernels(nf2 / 2 + 1),
                ms,
                mt,
                &fk_in,
                nf1,
                nf2,
                &mut fw,
                order,
            );
            let mut fk_out = vec![Complex::default(); ms * mt];
            deconvolve2d_type1(
                1.0,
                &flat_kernels(nf1 / 2 + 1),
                &flat_kernels(nf2 / 2 + 1),
                ms,
                mt,
                &mut fk_out,
                nf1,
                nf2,
                &fw,
                order,
            );
            assert_eq!(fk_in, fk_out, "round trip broke for {order:?}");
        }
    }

    #[test]
    fn cmcl_and_fft_layouts_differ_by_the_mode_permutation() {
        let (ms, mt, nf1, nf2) = (4usize, 4usize, 12usize, 12usize);
        let fw: Vec<Complex<f64>> = (0..nf1 * nf2)
            .map(|i| Complex::new(i as f64, -(i as f64) * 0.5))
            .collect();
        let ker1 = flat_kernels(nf1 / 2 + 1);
        let ker2 = flat_kernels(nf2 / 2 + 1);
        let mut cmcl = vec![Complex::default(); ms * mt];
        let mut fft = vec![Complex::default(); ms * mt];
        deconvolve2d_type1(
            1.0, &ker1, &ker2, ms, mt, &mut cmcl, nf1, nf2, &fw, ModeOrder::Cmcl,
        );
        deconvolve2d_type1(
            1.0, &ker1, &ker2, ms, mt, &mut fft, nf1, nf2, &fw, ModeOrder::Fft,
        );
        // index of mode (k1, k2) in each layout
        let at = |k1: i64, k2: i64, order: ModeOrder| -> usize {
            let fold = |k: i64, m: usize| -> usize {
                match order {
                    ModeOrder::Cmcl => (k + m as i64 / 2) as usize,
                    ModeOrder::Fft => k.rem_euclid(m as i64) as usize,
                }
            };
            fold(k2, mt) * ms + fold(k1, ms)
        };
        for k2 in -2i64..=1 {
            for k1 in -2i64..=1 {
                assert_eq!(
                    cmcl[at(k1, k2, ModeOrder::Cmcl)],
                    fft[at(k1, k2, ModeOrder::Fft)],
                    "mode ({k1},{k2}) disagrees between layouts"
                );
            }
        }
    }
}
