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
use crate::kernel::{eval_kernel_row, SpreadDirection, SpreadParams, MAX_NSPREAD};
use crate::opts::SpreadSort;
use crate::NufftSample;
use log::trace;
use novtb::{ParallelZonedIterator, TbSliceMut};
use num_complex::Complex;
use num_traits::{AsPrimitive, Float};

/// Folds a coordinate onto grid units in `[0, nf)`. With `pirange`
/// the input is radians folded by 2pi-periodicity, zero landing on
/// cell zero; grid index `n` therefore stands for the position
/// `2*pi*n/nf mod 2*pi`, which keeps the kernel Fourier tables free
/// of alternating-sign factors.
#[inline]
fn rescale<T: NufftSample>(x: T, nf: u64, pirange: bool) -> T
where
    f64: AsPrimitive<T>,
{
    let n: T = (nf as f64).as_();
    if pirange {
        let turns = x * T::FRAC_1_PI() * 0.5.as_();
        (turns - turns.floor()) * n
    } else if x < T::zero() {
        x + n
    } else if x > n {
        x - n
    } else {
        x
    }
}

/// Periodic wrap of a window cell index; callers guarantee
/// `-nf <= i < 2 * nf`, which grid sizing (`nf >= 2 * nspread`)
/// preserves for every window.
#[inline]
fn fold(i: i64, nf: u64) -> usize {
    let n = nf as i64;
    let mut i = i;
    if i < 0 {
        i += n;
    } else if i >= n {
        i -= n;
    }
    i as usize
}

/// First grid cell of the spreading window around `coord`, and the
/// (non-positive half-cell biased) offset of that cell from the
/// point. A point exactly on a half-cell boundary resolves to the
/// lower-indexed cell.
#[inline]
fn window_start<T: NufftSample>(coord: T, nf: u64, params: &SpreadParams) -> (i64, T)
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let x = rescale(coord, nf, params.pirange);
    let halfwidth: T = params.es_halfwidth.as_();
    let start = (x - halfwidth).ceil();
    let start_i: f64 = start.as_();
    (start_i as i64, start - x)
}

/// Validates every coordinate against the admissible range. A no-op
/// unless the bounds check is enabled in the spread parameters.
pub(crate) fn check_bounds<T: NufftSample>(
    nf1: u64,
    nf2: u64,
    xj: &[T],
    yj: &[T],
    params: &SpreadParams,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
{
    if !params.chkbnds {
        return Ok(());
    }
    if params.pirange {
        // the closed range [-3pi, 3pi] is admissible; comparing in
        // radians keeps the exact endpoints inside regardless of
        // rescaling round-off
        let limit: T = (3.0 * std::f64::consts::PI).as_();
        for (j, (&x, &y)) in xj.iter().zip(yj.iter()).enumerate() {
            if Float::abs(x) > limit || Float::abs(y) > limit {
                return Err(NufftError::SpreadBounds(j));
            }
        }
    } else {
        let n1: T = (nf1 as f64).as_();
        let n2: T = (nf2 as f64).as_();
        for (j, (&x, &y)) in xj.iter().zip(yj.iter()).enumerate() {
            let xr = rescale(x, nf1, false);
            let yr = rescale(y, nf2, false);
            if xr < T::zero() || xr > n1 || yr < T::zero() || yr > n2 {
                return Err(NufftError::SpreadBounds(j));
            }
        }
    }
    Ok(())
}

/// Bin-sorts the sources into coarse grid tiles and writes a
/// permutation that visits them tile by tile. Returns whether sorting
/// actually happened; if not, the permutation is the identity.
///
/// The `Auto` policy sorts only when the point count dominates the
/// grid, and the decision depends on nothing but the problem sizes.
pub(crate) fn bin_sort<T: NufftSample>(
    sort_indices: &mut [usize],
    nf1: u64,
    nf2: u64,
    xj: &[T],
    yj: &[T],
    params: &SpreadParams,
) -> Result<bool, NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = sort_indices.len();
    let wanted = match params.sort {
        SpreadSort::Off => false,
        SpreadSort::On => true,
        SpreadSort::Auto => nj as u64 > nf1 * nf2 / 16,
    };
    if !wanted || nj == 0 {
        for (i, slot) in sort_indices.iter_mut().enumerate() {
            *slot = i;
        }
        return Ok(false);
    }

    const BIN: u64 = 4;
    let nbins1 = nf1.div_ceil(BIN);
    let nbins2 = nf2.div_ceil(BIN);
    let nbins = (nbins1 * nbins2) as usize;
    if params.debug > 0 {
        trace!("bin-sort: {nj} pts over {nbins1}x{nbins2} bins");
    }

    let mut offsets = try_vec![0usize; nbins + 1];
    let mut bin_of = try_vec![0usize; nj];
    for (j, (&x, &y)) in xj.iter().zip(yj.iter()).enumerate() {
        let xr: f64 = rescale(x, nf1, params.pirange).as_();
        let yr: f64 = rescale(y, nf2, params.pirange).as_();
        let b1 = ((xr / BIN as f64) as u64).min(nbins1 - 1);
        let b2 = ((yr / BIN as f64) as u64).min(nbins2 - 1);
        let b = (b2 * nbins1 + b1) as usize;
        bin_of[j] = b;
        offsets[b + 1] += 1;
    }
    for b in 0..nbins {
        offsets[b + 1] += offsets[b];
    }
    if offsets[nbins] != nj {
        return Err(NufftError::SpreadSort);
    }
    for (j, &b) in bin_of.iter().enumerate() {
        sort_indices[offsets[b]] = j;
        offsets[b] += 1;
    }
    Ok(true)
}

/// Private accumulation target of one scatter worker: a row band of
/// the grid starting at (unwrapped) row `y0`, or the whole wrapped
/// plane when `y0 = 0` and the band spans `nf2` rows.
struct Subgrid<T> {
    y0: i64,
    data: Vec<Complex<T>>,
}

impl<T: NufftSample> Subgrid<T> {
    fn empty() -> Subgrid<T> {
        Subgrid {
            y0: 0,
            data: Vec::new(),
        }
    }
}

fn scatter_points<T: NufftSample>(
    idxs: &[usize],
    nf1: u64,
    nf2: u64,
    band: &mut [Complex<T>],
    y0: i64,
    wrap_rows: bool,
    xj: &[T],
    yj: &[T],
    cj: &[Complex<T>],
    params: &SpreadParams,
) where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let ns = params.nspread;
    let nf1u = nf1 as usize;
    let mut ker1 = [T::zero(); MAX_NSPREAD];
    let mut ker2 = [T::zero(); MAX_NSPREAD];
    for &j in idxs {
        let (i1, x1) = window_start(xj[j], nf1, params);
        let (i2, y1) = window_start(yj[j], nf2, params);
        eval_kernel_row(&mut ker1, x1, params);
        eval_kernel_row(&mut ker2, y1, params);
        let c = cj[j];
        for dy in 0..ns {
            let row = if wrap_rows {
                fold(i2 + dy as i64, nf2)
            } else {
                (i2 + dy as i64 - y0) as usize
            };
            let base = row * nf1u;
            let w2 = ker2[dy];
            for (dx, &w1) in ker1.iter().enumerate().take(ns) {
                let col = fold(i1 + dx as i64, nf1);
                band[base + col] += c * (w1 * w2);
            }
        }
    }
}

fn scatter_chunk<T: NufftSample>(
    idxs: &[usize],
    nf1: u64,
    nf2: u64,
    xj: &[T],
    yj: &[T],
    cj: &[Complex<T>],
    params: &SpreadParams,
    did_sort: bool,
) -> Result<Subgrid<T>, NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    if idxs.is_empty() {
        return Ok(Subgrid::empty());
    }
    let ns = params.nspread;
    let nf1u = nf1 as usize;

    // after a bin sort a chunk's windows cluster into a narrow row
    // band; bound it so the private buffer stays small
    let mut band = None;
    if did_sort {
        let mut lo = i64::MAX;
        let mut hi = i64::MIN;
        for &j in idxs {
            let (i2, _) = window_start(yj[j], nf2, params);
            lo = lo.min(i2);
            hi = hi.max(i2);
        }
        let height = (hi - lo) as usize + ns;
        if height < nf2 as usize {
            band = Some((lo, height));
        }
    }

    match band {
        Some((y0, height)) => {
            let mut data = try_vec![Complex::<T>::default(); height * nf1u];
            scatter_points(idxs, nf1, nf2, &mut data, y0, false, xj, yj, cj, params);
            Ok(Subgrid { y0, data })
        }
        None => {
            let mut data = try_vec![Complex::<T>::default(); nf2 as usize * nf1u];
            scatter_points(idxs, nf1, nf2, &mut data, 0, true, xj, yj, cj, params);
            Ok(Subgrid { y0: 0, data })
        }
    }
}

/// Direction-1 spread: scatters every source strength through the
/// kernel window onto the zeroed working grid, visiting sources in
/// the supplied permutation order.
///
/// With more than one worker the permuted list is cut into contiguous
/// chunks, each accumulated into a private subgrid, and the subgrids
/// are summed into `fw` in chunk order; for a fixed worker count and
/// permutation the result is bit-reproducible.
pub(crate) fn spread_sorted<T: NufftSample>(
    sort_indices: &[usize],
    nf1: u64,
    nf2: u64,
    fw: &mut [Complex<T>],
    xj: &[T],
    yj: &[T],
    cj: &[Complex<T>],
    params: &SpreadParams,
    did_sort: bool,
    nthreads: usize,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    if params.direction != SpreadDirection::Scatter {
        return Err(NufftError::SpreadDir(2));
    }
    for cell in fw.iter_mut() {
        *cell = Complex::default();
    }
    let nj = sort_indices.len();
    if nj == 0 {
        return Ok(());
    }

    let threads = nthreads.max(1).min(nj);
    if threads <= 1 {
        scatter_points(sort_indices, nf1, nf2, fw, 0, true, xj, yj, cj, params);
        return Ok(());
    }

    let chunk = nj.div_ceil(threads);
    let nchunks = nj.div_ceil(chunk);
    let mut slots: Vec<Result<Subgrid<T>, NufftError>> =
        (0..nchunks).map(|_| Ok(Subgrid::empty())).collect();
    let pool = novtb::ThreadPool::new(nchunks);
    slots
        .tb_par_chunks_exact_mut(1)
        .for_each_enumerated(&pool, |t, slot| {
            let lo = t * chunk;
            let hi = ((t + 1) * chunk).min(nj);
            slot[0] = scatter_chunk(&sort_indices[lo..hi], nf1, nf2, xj, yj, cj, params, did_sort);
        });

    let mut subgrids = Vec::with_capacity(nchunks);
    for slot in slots {
        subgrids.push(slot?);
    }
    let nf1u = nf1 as usize;
    for sub in subgrids.iter() {
        let rows = sub.data.len() / nf1u;
        for r in 0..rows {
            let dest_row = fold(sub.y0 + r as i64, nf2);
            let dest = &mut fw[dest_row * nf1u..][..nf1u];
            let src = &sub.data[r * nf1u..][..nf1u];
            for (d, s) in dest.iter_mut().zip(src.iter()) {
                *d += *s;
            }
        }
    }
    Ok(())
}

#[inline]
fn gather_one<T: NufftSample>(
    j: usize,
    nf1: u64,
    nf2: u64,
    fw: &[Complex<T>],
    xj: &[T],
    yj: &[T],
    params: &SpreadParams,
) -> Complex<T>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let ns = params.nspread;
    let nf1u = nf1 as usize;
    let mut ker1 = [T::zero(); MAX_NSPREAD];
    let mut ker2 = [T::zero(); MAX_NSPREAD];
    let (i1, x1) = window_start(xj[j], nf1, params);
    let (i2, y1) = window_start(yj[j], nf2, params);
    eval_kernel_row(&mut ker1, x1, params);
    eval_kernel_row(&mut ker2, y1, params);
    let mut acc = Complex::default();
    for dy in 0..ns {
        let base = fold(i2 + dy as i64, nf2) * nf1u;
        let mut row_acc = Complex::default();
        for (dx, &w1) in ker1.iter().enumerate().take(ns) {
            row_acc += fw[base + fold(i1 + dx as i64, nf1)] * w1;
        }
        acc += row_acc * ker2[dy];
    }
    acc
}

/// Direction-2 spread: interpolates the working grid at every target
/// through the kernel window. Each target strength is owned by
/// exactly one worker, so the result does not depend on the worker
/// count at all.
pub(crate) fn interp_sorted<T: NufftSample>(
    sort_indices: &[usize],
    nf1: u64,
    nf2: u64,
    fw: &[Complex<T>],
    xj: &[T],
    yj: &[T],
    cj: &mut [Complex<T>],
    params: &SpreadParams,
    _did_sort: bool,
    nthreads: usize,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    if params.direction != SpreadDirection::Gather {
        return Err(NufftError::SpreadDir(1));
    }
    let nj = cj.len();
    if nj == 0 {
        return Ok(());
    }
    let threads = nthreads.max(1).min(nj);
    if threads <= 1 {
        // the permutation keeps grid reads local when sorted
        for &j in sort_indices {
            cj[j] = gather_one(j, nf1, nf2, fw, xj, yj, params);
        }
        return Ok(());
    }
    let pool = novtb::ThreadPool::new(threads);
    cj.tb_par_chunks_exact_mut(1)
        .for_each_enumerated(&pool, |j, out| {
            out[0] = gather_one(j, nf1, nf2, fw, xj, yj, params);
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::setup_spreader;
    use rand::Rng;
    use std::f64::consts::PI;

    fn test_params(eps: f64) -> SpreadParams {
        setup_spreader(eps, 2.0).unwrap()
    }

    #[test]
    fn rescale_folds_periodically_with_zero_at_cell_zero() {
        let nf = 80u64;
        assert_eq!(rescale(0.0, nf, true), 0.0);
        assert!((rescale(PI, nf, true) - 40.0).abs() < 1e-12);
        assert!((rescale(-PI, nf, true) - 40.0).abs() < 1e-12);
        assert!((rescale(3.0 * PI, nf, true) - 40.0).abs() < 1e-12);
        assert!((rescale(-3.0 * PI, nf, true) - 40.0).abs() < 1e-12);
        // one period apart maps to the same grid position
        let a: f64 = rescale(0.7, nf, true);
        let b: f64 = rescale(0.7 - 2.0 * PI, nf, true);
        assert!((a - b).abs() < 1e-10);
        for x in [-8.0f64, -0.3, 0.0, 2.9, 9.1] {
            let r: f64 = rescale(x, nf, true);
            assert!((0.0..=80.0).contains(&r), "{x} escaped to {r}");
        }
    }

    #[test]
    fn bounds_check_admits_the_closed_range_and_flags_outside() {
        let params = test_params(1e-6);
        let ok_x = [0.0f64, PI, -PI, 3.0 * PI, -3.0 * PI];
        let ok_y = [0.0f64; 5];
        assert!(check_bounds(64, 64, &ok_x, &ok_y, &params).is_ok());

        let bad_x = [0.0f64, 3.0 * PI + 0.1];
        let bad_y = [0.0f64, 0.0];
        let err = check_bounds(64, 64, &bad_x, &bad_y, &params).unwrap_err();
        assert_eq!(err.code(), 4);
        assert!(matches!(err, NufftError::SpreadBounds(1)));

        let mut off = params.clone();
        off.chkbnds = false;
        assert!(check_bounds(64, 64, &bad_x, &bad_y, &off).is_ok());
    }

    #[test]
    fn bin_sort_produces_a_permutation() {
        let mut params = test_params(1e-6);
        params.sort = SpreadSort::On;
        let nj = 500;
        let mut rng = rand::rng();
        let xj: Vec<f64> = (0..nj).map(|_| rng.random_range(-PI..PI)).collect();
        let yj: Vec<f64> = (0..nj).map(|_| rng.random_range(-PI..PI)).collect();
        let mut idx = vec![0usize; nj];
        let did = bin_sort(&mut idx, 40, 40, &xj, &yj, &params).unwrap();
        assert!(did);
        let mut seen = idx.clone();
        seen.sort_unstable();
        assert!(seen.iter().enumerate().all(|(i, &v)| i == v));

        params.sort = SpreadSort::Off;
        let did = bin_sort(&mut idx, 40, 40, &xj, &yj, &params).unwrap();
        assert!(!did);
        assert!(idx.iter().enumerate().all(|(i, &v)| i == v));
    }

    #[test]
    fn auto_sort_heuristic_is_deterministic_in_the_sizes() {
        let params = test_params(1e-6);
        // few points over a large grid: identity
        let xj = vec![0.1f64; 8];
        let yj = vec![0.2f64; 8];
        let mut idx = vec![0usize; 8];
        assert!(!bin_sort(&mut idx, 100, 100, &xj, &yj, &params).unwrap());
        // many points over a tiny grid: sorted
        let xj = vec![0.1f64; 200];
        let yj = vec![0.2f64; 200];
        let mut idx = vec![0usize; 200];
        assert!(bin_sort(&mut idx, 20, 20, &xj, &yj, &params).unwrap());
    }

    #[test]
    fn single_point_spreads_a_compact_window() {
        let mut params = test_params(1e-6);
        params.direction = SpreadDirection::Scatter;
        let ns = params.nspread;
        let (nf1, nf2) = (32u64, 24u64);
        let xj = [0.3f64];
        let yj = [-0.7f64];
        let cj = [Complex::new(2.0, -1.0)];
        let mut fw = vec![Complex::default(); (nf1 * nf2) as usize];
        let idx = [0usize];
        spread_sorted(&idx, nf1, nf2, &mut fw, &xj, &yj, &cj, &params, false, 1).unwrap();

        let nonzero = fw.iter().filter(|v| v.norm() > 0.0).count();
        assert!(nonzero <= ns * ns);
        assert!(nonzero >= (ns - 1) * (ns - 1));

        // total mass is the separable product of the kernel rows
        let (_, x1) = window_start(xj[0], nf1, &params);
        let (_, y1) = window_start(yj[0], nf2, &params);
        let mut ker1 = [0.0f64; MAX_NSPREAD];
        let mut ker2 = [0.0f64; MAX_NSPREAD];
        eval_kernel_row(&mut ker1, x1, &params);
        eval_kernel_row(&mut ker2, y1, &params);
        let s1: f64 = ker1[..ns].iter().sum();
        let s2: f64 = ker2[..ns].iter().sum();
        let total: Complex<f64> = fw.iter().sum();
        let expected = cj[0] * (s1 * s2);
        assert!((total - expected).norm() < 1e-9 * expected.norm());
    }

    #[test]
    fn scatter_and_gather_are_adjoint() {
        let mut rng = rand::rng();
        let (nf1, nf2) = (30u64, 36u64);
        let nj = 120;
        let xj: Vec<f64> = (0..nj).map(|_| rng.random_range(-3.0 * PI..3.0 * PI)).collect();
        let yj: Vec<f64> = (0..nj).map(|_| rng.random_range(-3.0 * PI..3.0 * PI)).collect();
        let cj: Vec<Complex<f64>> = (0..nj)
            .map(|_| Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
            .collect();
        let grid: Vec<Complex<f64>> = (0..(nf1 * nf2) as usize)
            .map(|_| Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
            .collect();

        let mut params = test_params(1e-9);
        let idx: Vec<usize> = (0..nj).collect();

        params.direction = SpreadDirection::Scatter;
        let mut fw = vec![Complex::default(); (nf1 * nf2) as usize];
        spread_sorted(&idx, nf1, nf2, &mut fw, &xj, &yj, &cj, &params, false, 1).unwrap();
        let lhs: Complex<f64> = fw.iter().zip(grid.iter()).map(|(a, b)| a * b).sum();

        params.direction = SpreadDirection::Gather;
        let mut gj = vec![Complex::default(); nj];
        interp_sorted(&idx, nf1, nf2, &grid, &xj, &yj, &mut gj, &params, false, 1).unwrap();
        let rhs: Complex<f64> = gj.iter().zip(cj.iter()).map(|(a, b)| a * b).sum();

        assert!(
            (lhs - rhs).norm() < 1e-10 * lhs.norm().max(1.0),
            "adjoint mismatch {lhs} vs {rhs}"
        );
    }

    #[test]
    fn worker_count_does_not_change_the_scatter() {
        let mut rng = rand::rng();
        let (nf1, nf2) = (48u64, 40u64);
        let nj = 700;
        let xj: Vec<f64> = (0..nj).map(|_| rng.random_range(-PI..PI)).collect();
        let yj: Vec<f64> = (0..nj).map(|_| rng.random_range(-PI..PI)).collect();
        let cj: Vec<Complex<f64>> = (0..nj)
            .map(|_| Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
            .collect();

        let mut params = test_params(1e-9);
        params.direction = SpreadDirection::Scatter;
        params.sort = SpreadSort::On;
        let mut idx = vec![0usize; nj];
        let did = bin_sort(&mut idx, nf1, nf2, &xj, &yj, &params).unwrap();

        let mut serial = vec![Complex::default(); (nf1 * nf2) as usize];
        spread_sorted(&idx, nf1, nf2, &mut serial, &xj, &yj, &cj, &params, did, 1).unwrap();
        let scale: f64 = serial.iter().map(|v| v.norm()).fold(0.0, f64::max);
        for threads in [2usize, 4, 7] {
            let mut par = vec![Complex::default(); (nf1 * nf2) as usize];
            spread_sorted(&idx, nf1, nf2, &mut par, &xj, &yj, &cj, &params, did, threads).unwrap();
            for (i, (a, b)) in par.iter().zip(serial.iter()).enumerate() {
                assert!(
                    (a - b).norm() <= 1e-12 * scale,
                    "cell {i} differs with {threads} workers: {a} vs {b}"
                );
            }
        }
    }

    #[test]
    fn wrong_direction_is_rejected() {
        let mut params = test_params(1e-6);
        params.direction = SpreadDirection::Gather;
        let mut fw = vec![Complex::<f64>::default(); 32 * 32];
        let err = spread_sorted(&[0], 32, 32, &mut fw, &[0.0], &[0.0], &[Complex::default()], &params, false, 1)
            .unwrap_err();
        assert_eq!(err.code(), 6);
    }
}
