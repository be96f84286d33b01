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
use crate::deconvolve::{deconvolve2d_type1, deconvolve2d_type2};
use crate::err::{try_vec, NufftError};
use crate::fft::Fft2dPlan;
use crate::fseries::{fseries_kernel, nuft_kernel};
use crate::gridsize::{set_nf_type12, set_nhg_type3, MAX_NF};
use crate::kernel::{setup_spreader_for_nufft, SpreadDirection, SpreadParams};
use crate::opts::{ModeOrder, NufftOpts};
use crate::spread::{bin_sort, check_bounds, interp_sorted, spread_sorted};
use crate::NufftSample;
use log::debug;
use novtb::{ParallelZonedIterator, TbSliceMut};
use num_complex::Complex;
use num_traits::AsPrimitive;
use std::time::Instant;

#[inline]
fn expect_len(got: usize, expected: usize) -> Result<(), NufftError> {
    if got != expected {
        return Err(NufftError::MismatchedLengths(got, expected));
    }
    Ok(())
}

/// Process-wide worker count, overridable through the options record.
fn worker_threads(opts: &NufftOpts) -> usize {
    if opts.nthreads > 0 {
        opts.nthreads
    } else {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

fn grid_total(nf1: u64, nf2: u64) -> Result<u64, NufftError> {
    let total = nf1.checked_mul(nf2).unwrap_or(u64::MAX);
    if total > MAX_NF {
        return Err(NufftError::MaxAllocExceeded(total));
    }
    Ok(total)
}

/// `exp(i*theta)` with the sign of the transform's exponent applied.
#[inline]
fn phase_rotor<T: NufftSample>(theta: T, positive: bool) -> Complex<T> {
    let theta = if positive { theta } else { -theta };
    Complex::new(theta.cos(), theta.sin())
}

/// Half-width and centre of the interval enclosing `a`. Nearly
/// centred clouds are snapped to a zero centre, growing the width so
/// the enclosure still holds.
fn arraywidcen<T: NufftSample>(a: &[T]) -> (f64, f64)
where
    T: AsPrimitive<f64>,
{
    if a.is_empty() {
        return (0.0, 0.0);
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in a {
        let v: f64 = v.as_();
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let mut width = (hi - lo) / 2.0;
    let mut centre = (hi + lo) / 2.0;
    if centre.abs() < 0.1 * width {
        width += centre.abs();
        centre = 0.0;
    }
    (width, centre)
}

/// Spreader parameters, grid sizes and kernel Fourier tables shared
/// by every type-1/2 pipeline.
struct Setup<T> {
    params: SpreadParams,
    nf1: u64,
    nf2: u64,
    fser1: Vec<T>,
    fser2: Vec<T>,
}

fn setup_type12<T: NufftSample>(
    label: &str,
    nj: usize,
    ms: usize,
    mt: usize,
    eps: f64,
    opts: &NufftOpts,
    direction: SpreadDirection,
) -> Result<Setup<T>, NufftError>
where
    f64: AsPrimitive<T>,
{
    let mut params = setup_spreader_for_nufft(eps, opts)?;
    params.direction = direction;
    let nf1 = set_nf_type12(ms, opts.upsampfac, params.nspread);
    let nf2 = set_nf_type12(mt, opts.upsampfac, params.nspread);
    grid_total(nf1, nf2)?;
    if opts.debug > 0 {
        debug!("{label}: (ms,mt)=({ms},{mt}) (nf1,nf2)=({nf1},{nf2}) nj={nj}");
    }

    let timer = Instant::now();
    let fser1 = fseries_kernel::<T>(nf1, &params)?;
    let fser2 = fseries_kernel::<T>(nf2, &params)?;
    if opts.debug > 0 {
        debug!(
            "kernel fser (ns={}):\t {:.3e} s",
            params.nspread,
            timer.elapsed().as_secs_f64()
        );
    }
    Ok(Setup {
        params,
        nf1,
        nf2,
        fser1,
        fser2,
    })
}

/// Type-1 2D transform: evaluates
/// `fk[k1,k2] = sum_j cj[j] exp(+-i (k1 xj[j] + k2 yj[j]))` for the
/// centred mode block `k1 in [-ms/2, (ms-1)/2]`,
/// `k2 in [-mt/2, (mt-1)/2]`, to relative precision `eps`.
///
/// `fk` holds `ms * mt` modes, `k1` fast and `k2` slow, each axis laid
/// out per `opts.modeord`. A non-negative `iflag` selects the `+` sign
/// in the exponential. Coordinates are radians in `[-3pi, 3pi]`.
pub fn nufft2d1<T: NufftSample>(
    xj: &[T],
    yj: &[T],
    cj: &[Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &mut [Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    expect_len(yj.len(), nj)?;
    expect_len(cj.len(), nj)?;
    expect_len(fk.len(), ms * mt)?;

    let setup = setup_type12::<T>("2d1", nj, ms, mt, eps, opts, SpreadDirection::Scatter)?;
    let (nf1, nf2) = (setup.nf1, setup.nf2);

    let nth = worker_threads(opts);
    let timer = Instant::now();
    let plan = Fft2dPlan::<T>::plan(nf1 as usize, nf2 as usize, iflag, opts.fftw, nth)?;
    let mut fw = try_vec![Complex::<T>::default(); (nf1 * nf2) as usize];
    if opts.debug > 0 {
        debug!(
            "fft plan ({}):\t {:.3e} s",
            opts.fftw,
            timer.elapsed().as_secs_f64()
        );
    }

    let timer = Instant::now();
    check_bounds(nf1, nf2, xj, yj, &setup.params)?;
    let mut sort_indices = try_vec![0usize; nj];
    let did_sort = bin_sort(&mut sort_indices, nf1, nf2, xj, yj, &setup.params)?;
    spread_sorted(
        &sort_indices,
        nf1,
        nf2,
        &mut fw,
        xj,
        yj,
        cj,
        &setup.params,
        did_sort,
        nth,
    )?;
    if opts.debug > 0 {
        debug!(
            "spread (sorted={did_sort}):\t {:.3e} s",
            timer.elapsed().as_secs_f64()
        );
    }

    let timer = Instant::now();
    plan.execute(&mut fw)?;
    if opts.debug > 0 {
        debug!("fft ({nth} threads):\t {:.3e} s", timer.elapsed().as_secs_f64());
    }

    let timer = Instant::now();
    deconvolve2d_type1(
        T::one(),
        &setup.fser1,
        &setup.fser2,
        ms,
        mt,
        fk,
        nf1 as usize,
        nf2 as usize,
        &fw,
        opts.modeord,
    );
    if opts.debug > 0 {
        debug!(
            "deconvolve & copy out:\t {:.3e} s",
            timer.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

/// Type-2 2D transform: evaluates
/// `cj[j] = sum_{k1,k2} fk[k1,k2] exp(+-i (k1 xj[j] + k2 yj[j]))` at
/// every non-uniform target, the adjoint data flow of [nufft2d1].
///
/// `fk` supplies `ms * mt` modes in the `opts.modeord` layout.
pub fn nufft2d2<T: NufftSample>(
    xj: &[T],
    yj: &[T],
    cj: &mut [Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &[Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    expect_len(yj.len(), nj)?;
    expect_len(cj.len(), nj)?;
    expect_len(fk.len(), ms * mt)?;

    let setup = setup_type12::<T>("2d2", nj, ms, mt, eps, opts, SpreadDirection::Gather)?;
    let (nf1, nf2) = (setup.nf1, setup.nf2);

    let nth = worker_threads(opts);
    let timer = Instant::now();
    let plan = Fft2dPlan::<T>::plan(nf1 as usize, nf2 as usize, iflag, opts.fftw, nth)?;
    let mut fw = try_vec![Complex::<T>::default(); (nf1 * nf2) as usize];
    if opts.debug > 0 {
        debug!(
            "fft plan ({}):\t {:.3e} s",
            opts.fftw,
            timer.elapsed().as_secs_f64()
        );
    }

    let timer = Instant::now();
    deconvolve2d_type2(
        T::one(),
        &setup.fser1,
        &setup.fser2,
        ms,
        mt,
        fk,
        nf1 as usize,
        nf2 as usize,
        &mut fw,
        opts.modeord,
    );
    if opts.debug > 0 {
        debug!(
            "amplify & copy in:\t {:.3e} s",
            timer.elapsed().as_secs_f64()
        );
    }

    let timer = Instant::now();
    plan.execute(&mut fw)?;
    if opts.debug > 0 {
        debug!("fft ({nth} threads):\t {:.3e} s", timer.elapsed().as_secs_f64());
    }

    let timer = Instant::now();
    check_bounds(nf1, nf2, xj, yj, &setup.params)?;
    let mut sort_indices = try_vec![0usize; nj];
    let did_sort = bin_sort(&mut sort_indices, nf1, nf2, xj, yj, &setup.params)?;
    interp_sorted(
        &sort_indices,
        nf1,
        nf2,
        &fw,
        xj,
        yj,
        cj,
        &setup.params,
        did_sort,
        nth,
    )?;
    if opts.debug > 0 {
        debug!(
            "unspread (sorted={did_sort}):\t {:.3e} s",
            timer.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

/// Type-3 2D transform: evaluates
/// `fk[k] = sum_j cj[j] exp(+-i (s[k] xj[j] + t[k] yj[j]))` for
/// arbitrary real source positions and target frequencies.
///
/// Both point clouds are recentred and rescaled so one type-1 spread
/// plus an internal type-2 over an oversampled grid covers the
/// space-bandwidth product; a failure of the internal stage is
/// returned like any other error.
pub fn nufft2d3<T: NufftSample>(
    xj: &[T],
    yj: &[T],
    cj: &[Complex<T>],
    iflag: i32,
    eps: f64,
    s: &[T],
    t: &[T],
    fk: &mut [Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    let nk = s.len();
    expect_len(yj.len(), nj)?;
    expect_len(cj.len(), nj)?;
    expect_len(t.len(), nk)?;
    expect_len(fk.len(), nk)?;

    let mut params = setup_spreader_for_nufft(eps, opts)?;
    params.direction = SpreadDirection::Scatter;
    let positive = iflag >= 0;
    let nth = worker_threads(opts);

    let (x1w, c1) = arraywidcen(xj);
    let (s1w, d1) = arraywidcen(s);
    let (x2w, c2) = arraywidcen(yj);
    let (s2w, d2) = arraywidcen(t);
    let (nf1, h1, gam1) = set_nhg_type3(s1w, x1w, opts.upsampfac, params.nspread);
    let (nf2, h2, gam2) = set_nhg_type3(s2w, x2w, opts.upsampfac, params.nspread);
    if opts.debug > 0 {
        debug!(
            "2d3: X1={x1w:.3e} C1={c1:.3e} S1={s1w:.3e} D1={d1:.3e} gam1={gam1:.3} nf1={nf1} \
             X2={x2w:.3e} C2={c2:.3e} S2={s2w:.3e} D2={d2:.3e} gam2={gam2:.3} nf2={nf2} nj={nj} nk={nk}"
        );
    }
    let total = grid_total(nf1, nf2)?;

    // Step 1: recentre, rescale and prephase the sources, then
    // spread them as in type-1.
    let timer = Instant::now();
    let mut fw = try_vec![Complex::<T>::default(); total as usize];
    {
        let mut xpj = try_vec![T::zero(); nj];
        let mut ypj = try_vec![T::zero(); nj];
        let c1t: T = c1.as_();
        let c2t: T = c2.as_();
        let g1t: T = gam1.as_();
        let g2t: T = gam2.as_();
        for j in 0..nj {
            xpj[j] = (xj[j] - c1t) / g1t;
            ypj[j] = (yj[j] - c2t) / g2t;
        }

        let mut cpj = try_vec![Complex::<T>::default(); nj];
        if d1 != 0.0 || d2 != 0.0 {
            let d1t: T = d1.as_();
            let d2t: T = d2.as_();
            if nth > 1 && nj > 1 {
                let pool = novtb::ThreadPool::new(nth);
                cpj.tb_par_chunks_exact_mut(1)
                    .for_each_enumerated(&pool, |j, out| {
                        out[0] = cj[j] * phase_rotor(d1t * xj[j] + d2t * yj[j], positive);
                    });
            } else {
                for j in 0..nj {
                    cpj[j] = cj[j] * phase_rotor(d1t * xj[j] + d2t * yj[j], positive);
                }
            }
            if opts.debug > 0 {
                debug!("prephase:\t\t {:.3e} s", timer.elapsed().as_secs_f64());
            }
        } else {
            cpj.copy_from_slice(cj);
        }

        let timer = Instant::now();
        check_bounds(nf1, nf2, &xpj, &ypj, &params)?;
        let mut sort_indices = try_vec![0usize; nj];
        let did_sort = bin_sort(&mut sort_indices, nf1, nf2, &xpj, &ypj, &params)?;
        spread_sorted(
            &sort_indices,
            nf1,
            nf2,
            &mut fw,
            &xpj,
            &ypj,
            &cpj,
            &params,
            did_sort,
            nth,
        )?;
        if opts.debug > 0 {
            debug!(
                "spread (sorted={did_sort}):\t {:.3e} s",
                timer.elapsed().as_secs_f64()
            );
        }
    }

    // Step 2: rescale the target frequencies and evaluate the grid as
    // a Fourier series there through the type-2 pipeline. The grid is
    // in natural index order, so its modes are FFT-ordered.
    let timer = Instant::now();
    let mut sp = try_vec![T::zero(); nk];
    let mut tp = try_vec![T::zero(); nk];
    let hg1: T = (h1 * gam1).as_();
    let hg2: T = (h2 * gam2).as_();
    let d1t: T = d1.as_();
    let d2t: T = d2.as_();
    for k in 0..nk {
        sp[k] = hg1 * (s[k] - d1t);
        tp[k] = hg2 * (t[k] - d2t);
    }
    let mut inner_opts = opts.clone();
    inner_opts.modeord = ModeOrder::Fft;
    nufft2d2(
        &sp,
        &tp,
        fk,
        iflag,
        eps,
        nf1 as usize,
        nf2 as usize,
        &fw,
        &inner_opts,
    )?;
    drop(fw);
    if opts.debug > 0 {
        debug!("total type-2:\t {:.3e} s", timer.elapsed().as_secs_f64());
    }

    // Step 3: divide out the Fourier transform of the scaled kernel
    // at each target, and restore the source-centre phases.
    let timer = Instant::now();
    let fkker1 = nuft_kernel(&sp, &params)?;
    let fkker2 = nuft_kernel(&tp, &params)?;
    if opts.debug > 0 {
        debug!(
            "kernel FT (ns={}):\t {:.3e} s",
            params.nspread,
            timer.elapsed().as_secs_f64()
        );
    }

    let timer = Instant::now();
    let recentre = c1.is_finite() && c2.is_finite() && (c1 != 0.0 || c2 != 0.0);
    if recentre {
        let c1t: T = c1.as_();
        let c2t: T = c2.as_();
        if nth > 1 && nk > 1 {
            let pool = novtb::ThreadPool::new(nth);
            fk.tb_par_chunks_exact_mut(1)
                .for_each_enumerated(&pool, |k, out| {
                    let gain = T::one() / (fkker1[k] * fkker2[k]);
                    let phase = (s[k] - d1t) * c1t + (t[k] - d2t) * c2t;
                    out[0] = out[0] * phase_rotor(phase, positive) * gain;
                });
        } else {
            for k in 0..nk {
                let gain = T::one() / (fkker1[k] * fkker2[k]);
                let phase = (s[k] - d1t) * c1t + (t[k] - d2t) * c2t;
                fk[k] = fk[k] * phase_rotor(phase, positive) * gain;
            }
        }
    } else {
        for k in 0..nk {
            fk[k] = fk[k] * (T::one() / (fkker1[k] * fkker2[k]));
        }
    }
    if opts.debug > 0 {
        debug!("deconvolve:\t\t {:.3e} s", timer.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Batched type-1: `ndata` strength vectors over one shared geometry,
/// outputs concatenated dataset by dataset.
pub fn nufft2d1_many<T: NufftSample>(
    ndata: usize,
    xj: &[T],
    yj: &[T],
    c: &[Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &mut [Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    if ndata < 1 {
        return Err(NufftError::NdataNotValid(ndata));
    }
    let nj = xj.len();
    expect_len(yj.len(), nj)?;
    expect_len(c.len(), nj * ndata)?;
    expect_len(fk.len(), ms * mt * ndata)?;
    if nj == 0 {
        for v in fk.iter_mut() {
            *v = Complex::default();
        }
        return Ok(());
    }
    if opts.many_seq {
        nufft2d1_many_seq(ndata, xj, yj, c, iflag, eps, ms, mt, fk, opts)
    } else {
        nufft2d1_many_simul(ndata, xj, yj, c, iflag, eps, ms, mt, fk, opts)
    }
}

fn nufft2d1_many_seq<T: NufftSample>(
    ndata: usize,
    xj: &[T],
    yj: &[T],
    c: &[Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &mut [Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    let setup = setup_type12::<T>("2d1 manyseq", nj, ms, mt, eps, opts, SpreadDirection::Scatter)?;
    let (nf1, nf2) = (setup.nf1, setup.nf2);
    if opts.debug > 0 {
        debug!("2d1 manyseq: ndata={ndata}");
    }

    let nth = worker_threads(opts);
    let plan = Fft2dPlan::<T>::plan(nf1 as usize, nf2 as usize, iflag, opts.fftw, nth)?;
    let mut fw = try_vec![Complex::<T>::default(); (nf1 * nf2) as usize];

    check_bounds(nf1, nf2, xj, yj, &setup.params)?;
    let mut sort_indices = try_vec![0usize; nj];
    let did_sort = bin_sort(&mut sort_indices, nf1, nf2, xj, yj, &setup.params)?;

    let mut time_spread = 0.0f64;
    let mut time_fft = 0.0f64;
    let mut time_deconv = 0.0f64;
    let nmodes = ms * mt;
    for (ci, fki) in c.chunks_exact(nj).zip(fk.chunks_exact_mut(nmodes)) {
        let timer = Instant::now();
        spread_sorted(
            &sort_indices,
            nf1,
            nf2,
            &mut fw,
            xj,
            yj,
            ci,
            &setup.params,
            did_sort,
            nth,
        )?;
        time_spread += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        plan.execute(&mut fw)?;
        time_fft += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        deconvolve2d_type1(
            T::one(),
            &setup.fser1,
            &setup.fser2,
            ms,
            mt,
            fki,
            nf1 as usize,
            nf2 as usize,
            &fw,
            opts.modeord,
        );
        time_deconv += timer.elapsed().as_secs_f64();
    }
    if opts.debug > 0 {
        debug!("[manyseq] spread:\t\t {time_spread:.3e} s");
        debug!("[manyseq] fft ({nth} threads):\t {time_fft:.3e} s");
        debug!("[manyseq] deconvolve & copy out:\t {time_deconv:.3e} s");
    }
    Ok(())
}

fn nufft2d1_many_simul<T: NufftSample>(
    ndata: usize,
    xj: &[T],
    yj: &[T],
    c: &[Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &mut [Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    let setup = setup_type12::<T>("2d1 manysimul", nj, ms, mt, eps, opts, SpreadDirection::Scatter)?;
    let (nf1, nf2) = (setup.nf1, setup.nf2);
    if opts.debug > 0 {
        debug!("2d1 manysimul: ndata={ndata}");
    }

    let nth = worker_threads(opts);
    let nplanes = nth.min(ndata);
    let plane = (nf1 * nf2) as usize;
    let plan = Fft2dPlan::<T>::plan_many(nf1 as usize, nf2 as usize, nplanes, iflag, opts.fftw, nth)?;
    let mut fw = try_vec![Complex::<T>::default(); plane * nplanes];

    check_bounds(nf1, nf2, xj, yj, &setup.params)?;
    let mut sort_indices = try_vec![0usize; nj];
    let did_sort = bin_sort(&mut sort_indices, nf1, nf2, xj, yj, &setup.params)?;

    let pool = novtb::ThreadPool::new(nplanes);
    let nmodes = ms * mt;
    let mut time_spread = 0.0f64;
    let mut time_fft = 0.0f64;
    let mut time_deconv = 0.0f64;
    let mut base = 0usize;
    while base < ndata {
        let cur = (ndata - base).min(nplanes);

        // one worker per plane; the inner spreader stays
        // single-threaded so the pools do not nest
        let timer = Instant::now();
        {
            let mut work: Vec<(&mut [Complex<T>], Result<(), NufftError>)> = fw[..cur * plane]
                .chunks_exact_mut(plane)
                .map(|p| (p, Ok(())))
                .collect();
            work.tb_par_chunks_exact_mut(1)
                .for_each_enumerated(&pool, |i, slot| {
                    let (plane_buf, res) = &mut slot[0];
                    let ci = &c[(base + i) * nj..][..nj];
                    *res = spread_sorted(
                        &sort_indices,
                        nf1,
                        nf2,
                        plane_buf,
                        xj,
                        yj,
                        ci,
                        &setup.params,
                        did_sort,
                        1,
                    );
                });
            for (_, res) in work.iter() {
                if let Err(e) = res {
                    return Err(e.clone());
                }
            }
        }
        time_spread += timer.elapsed().as_secs_f64();

        // stale trailing planes of a remainder chunk ride along and
        // are never read back
        let timer = Instant::now();
        plan.execute(&mut fw)?;
        time_fft += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        {
            let mut work: Vec<(&mut [Complex<T>], &[Complex<T>])> = fk
                [base * nmodes..(base + cur) * nmodes]
                .chunks_exact_mut(nmodes)
                .zip(fw[..cur * plane].chunks_exact(plane))
                .collect();
            work.tb_par_chunks_exact_mut(1).for_each(&pool, |slot| {
                let pair = &mut slot[0];
                deconvolve2d_type1(
                    T::one(),
                    &setup.fser1,
                    &setup.fser2,
                    ms,
                    mt,
                    pair.0,
                    nf1 as usize,
                    nf2 as usize,
                    pair.1,
                    opts.modeord,
                );
            });
        }
        time_deconv += timer.elapsed().as_secs_f64();

        base += cur;
    }
    if opts.debug > 0 {
        debug!("[manysimul] spread:\t\t {time_spread:.3e} s");
        debug!("[manysimul] fft ({nplanes} planes):\t {time_fft:.3e} s");
        debug!("[manysimul] deconvolve & copy out:\t {time_deconv:.3e} s");
    }
    Ok(())
}

/// Batched type-2: `ndata` mode vectors over one shared geometry,
/// target strengths concatenated dataset by dataset.
pub fn nufft2d2_many<T: NufftSample>(
    ndata: usize,
    xj: &[T],
    yj: &[T],
    c: &mut [Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &[Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    if ndata < 1 {
        return Err(NufftError::NdataNotValid(ndata));
    }
    let nj = xj.len();
    expect_len(yj.len(), nj)?;
    expect_len(c.len(), nj * ndata)?;
    expect_len(fk.len(), ms * mt * ndata)?;
    if nj == 0 {
        return Ok(());
    }
    if opts.many_seq {
        nufft2d2_many_seq(ndata, xj, yj, c, iflag, eps, ms, mt, fk, opts)
    } else {
        nufft2d2_many_simul(ndata, xj, yj, c, iflag, eps, ms, mt, fk, opts)
    }
}

fn nufft2d2_many_seq<T: NufftSample>(
    ndata: usize,
    xj: &[T],
    yj: &[T],
    c: &mut [Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &[Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    let setup = setup_type12::<T>("2d2 manyseq", nj, ms, mt, eps, opts, SpreadDirection::Gather)?;
    let (nf1, nf2) = (setup.nf1, setup.nf2);
    if opts.debug > 0 {
        debug!("2d2 manyseq: ndata={ndata}");
    }

    let nth = worker_threads(opts);
    let plan = Fft2dPlan::<T>::plan(nf1 as usize, nf2 as usize, iflag, opts.fftw, nth)?;
    let mut fw = try_vec![Complex::<T>::default(); (nf1 * nf2) as usize];

    check_bounds(nf1, nf2, xj, yj, &setup.params)?;
    let mut sort_indices = try_vec![0usize; nj];
    let did_sort = bin_sort(&mut sort_indices, nf1, nf2, xj, yj, &setup.params)?;

    let mut time_spread = 0.0f64;
    let mut time_fft = 0.0f64;
    let mut time_deconv = 0.0f64;
    let nmodes = ms * mt;
    for (ci, fki) in c.chunks_exact_mut(nj).zip(fk.chunks_exact(nmodes)) {
        let timer = Instant::now();
        deconvolve2d_type2(
            T::one(),
            &setup.fser1,
            &setup.fser2,
            ms,
            mt,
            fki,
            nf1 as usize,
            nf2 as usize,
            &mut fw,
            opts.modeord,
        );
        time_deconv += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        plan.execute(&mut fw)?;
        time_fft += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        interp_sorted(
            &sort_indices,
            nf1,
            nf2,
            &fw,
            xj,
            yj,
            ci,
            &setup.params,
            did_sort,
            nth,
        )?;
        time_spread += timer.elapsed().as_secs_f64();
    }
    if opts.debug > 0 {
        debug!("[manyseq] amplify & copy in:\t {time_deconv:.3e} s");
        debug!("[manyseq] fft ({nth} threads):\t {time_fft:.3e} s");
        debug!("[manyseq] unspread:\t\t {time_spread:.3e} s");
    }
    Ok(())
}

fn nufft2d2_many_simul<T: NufftSample>(
    ndata: usize,
    xj: &[T],
    yj: &[T],
    c: &mut [Complex<T>],
    iflag: i32,
    eps: f64,
    ms: usize,
    mt: usize,
    fk: &[Complex<T>],
    opts: &NufftOpts,
) -> Result<(), NufftError>
where
    f64: AsPrimitive<T>,
    T: AsPrimitive<f64>,
{
    let nj = xj.len();
    let setup = setup_type12::<T>("2d2 manysimul", nj, ms, mt, eps, opts, SpreadDirection::Gather)?;
    let (nf1, nf2) = (setup.nf1, setup.nf2);
    if opts.debug > 0 {
        debug!("2d2 manysimul: ndata={ndata}");
    }

    let nth = worker_threads(opts);
    let nplanes = nth.min(ndata);
    let plane = (nf1 * nf2) as usize;
    let plan = Fft2dPlan::<T>::plan_many(nf1 as usize, nf2 as usize, nplanes, iflag, opts.fftw, nth)?;
    let mut fw = try_vec![Complex::<T>::default(); plane * nplanes];

    check_bounds(nf1, nf2, xj, yj, &setup.params)?;
    let mut sort_indices = try_vec![0usize; nj];
    let did_sort = bin_sort(&mut sort_indices, nf1, nf2, xj, yj, &setup.params)?;

    let pool = novtb::ThreadPool::new(nplanes);
    let nmodes = ms * mt;
    let mut time_spread = 0.0f64;
    let mut time_fft = 0.0f64;
    let mut time_deconv = 0.0f64;
    let mut base = 0usize;
    while base < ndata {
        let cur = (ndata - base).min(nplanes);

        let timer = Instant::now();
        {
            let mut work: Vec<(&mut [Complex<T>], &[Complex<T>])> = fw[..cur * plane]
                .chunks_exact_mut(plane)
                .zip(fk[base * nmodes..(base + cur) * nmodes].chunks_exact(nmodes))
                .collect();
            work.tb_par_chunks_exact_mut(1).for_each(&pool, |slot| {
                let pair = &mut slot[0];
                deconvolve2d_type2(
                    T::one(),
                    &setup.fser1,
                    &setup.fser2,
                    ms,
                    mt,
                    pair.1,
                    nf1 as usize,
                    nf2 as usize,
                    pair.0,
                    opts.modeord,
                );
            });
        }
        time_deconv += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        plan.execute(&mut fw)?;
        time_fft += timer.elapsed().as_secs_f64();

        let timer = Instant::now();
        {
            let fw_ref: &[Complex<T>] = &fw;
            let mut work: Vec<(&mut [Complex<T>], Result<(), NufftError>)> = c
                [base * nj..(base + cur) * nj]
                .chunks_exact_mut(nj)
                .map(|p| (p, Ok(())))
                .collect();
            work.tb_par_chunks_exact_mut(1)
                .for_each_enumerated(&pool, |i, slot| {
                    let (ci, res) = &mut slot[0];
                    let fw_plane = &fw_ref[i * plane..][..plane];
                    *res = interp_sorted(
                        &sort_indices,
                        nf1,
                        nf2,
                        fw_plane,
                        xj,
                        yj,
                        ci,
                        &setup.params,
                        did_sort,
                        1,
                    );
                });
            for (_, res) in work.iter() {
                if let Err(e) = res {
                    return Err(e.clone());
                }
            }
        }
        time_spread += timer.elapsed().as_secs_f64();

        base += cur;
    }
    if opts.debug > 0 {
        debug!("[manysimul] amplify & copy in:\t {time_deconv:.3e} s");
        debug!("[manysimul] fft ({nplanes} planes):\t {time_fft:.3e} s");
        debug!("[manysimul] unspread:\t\t {time_spread:.3e} s");
    }
    Ok(())
}
