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
use crate::err::NufftError;
use crate::opts::{NufftOpts, SpreadSort};
use crate::NufftSample;
use num_traits::{AsPrimitive, Float};

/// Widest spreading window any precision request can produce, in grid
/// cells per side.
pub(crate) const MAX_NSPREAD: usize = 16;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum SpreadDirection {
    /// Non-uniform strengths onto the uniform grid (type-1 step).
    Scatter,
    /// Uniform grid values onto non-uniform targets (type-2 step).
    Gather,
}

/// Parameters of the "exp-sqrt" spreading kernel
/// `phi(x) = exp(es_beta * sqrt(1 - es_c * x^2))` on `|x| < nspread/2`,
/// plus the per-call spreader switches derived from the user options.
#[derive(Debug, Clone)]
pub(crate) struct SpreadParams {
    pub nspread: usize,
    pub es_beta: f64,
    pub es_c: f64,
    pub es_halfwidth: f64,
    pub upsampfac: f64,
    pub direction: SpreadDirection,
    /// Coordinates are radians in [-3pi, 3pi] rather than already in
    /// grid units.
    pub pirange: bool,
    pub chkbnds: bool,
    pub sort: SpreadSort,
    pub debug: i32,
}

/// Chooses the kernel half-width and shape delivering the requested
/// relative precision `eps` at upsampling factor `upsampfac`.
pub(crate) fn setup_spreader(eps: f64, upsampfac: f64) -> Result<SpreadParams, NufftError> {
    if upsampfac != 2.0 && upsampfac != 1.25 {
        return Err(NufftError::UpsampfacTooSmall(upsampfac));
    }

    let ns = if upsampfac == 2.0 {
        // one digit of accuracy per grid cell of width at sigma = 2
        (-(eps / 10.0).log10()).ceil()
    } else {
        (-eps.ln() / (std::f64::consts::PI * (1.0 - 1.0 / upsampfac).sqrt())).ceil()
    };
    let ns = (ns.max(2.0)) as usize;
    if ns > MAX_NSPREAD {
        return Err(NufftError::EpsTooSmall(eps));
    }

    let beta_over_ns = if upsampfac == 2.0 {
        match ns {
            2 => 2.20,
            3 => 2.26,
            4 => 2.38,
            _ => 2.30,
        }
    } else {
        let gamma = 0.97;
        gamma * std::f64::consts::PI * (1.0 - 1.0 / (2.0 * upsampfac))
    };

    Ok(SpreadParams {
        nspread: ns,
        es_beta: beta_over_ns * ns as f64,
        es_c: 4.0 / (ns * ns) as f64,
        es_halfwidth: ns as f64 / 2.0,
        upsampfac,
        direction: SpreadDirection::Scatter,
        pirange: true,
        chkbnds: true,
        sort: SpreadSort::Auto,
        debug: 0,
    })
}

/// [setup_spreader] plus the switches the driver copies out of the
/// user-facing options record.
pub(crate) fn setup_spreader_for_nufft(
    eps: f64,
    opts: &NufftOpts,
) -> Result<SpreadParams, NufftError> {
    let mut params = setup_spreader(eps, opts.upsampfac)?;
    params.sort = opts.spread_sort;
    params.chkbnds = opts.chkbnds;
    params.debug = opts.spread_debug;
    Ok(params)
}

/// Kernel value at offset `x` grid cells from the window centre.
#[inline]
pub(crate) fn evaluate_kernel<T: NufftSample>(x: T, params: &SpreadParams) -> T
where
    f64: AsPrimitive<T>,
{
    let halfwidth: T = params.es_halfwidth.as_();
    if Float::abs(x) >= halfwidth {
        T::zero()
    } else {
        let c: T = params.es_c.as_();
        let beta: T = params.es_beta.as_();
        // rounding may push the radicand a hair below zero at the edge
        (beta * (T::one() - c * x * x).max(T::zero()).sqrt()).exp()
    }
}

/// Fills `ker[0..nspread]` with kernel values at the window offsets
/// `x1, x1+1, ..`, the separable 1D factor of the outer product the
/// spreader applies.
#[inline]
pub(crate) fn eval_kernel_row<T: NufftSample>(ker: &mut [T; MAX_NSPREAD], x1: T, params: &SpreadParams)
where
    f64: AsPrimitive<T>,
{
    for (l, k) in ker.iter_mut().enumerate().take(params.nspread) {
        *k = evaluate_kernel(x1 + (l as f64).as_(), params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_tracks_requested_digits() {
        assert_eq!(setup_spreader(1e-2, 2.0).unwrap().nspread, 3);
        assert_eq!(setup_spreader(1e-6, 2.0).unwrap().nspread, 7);
        assert_eq!(setup_spreader(1e-9, 2.0).unwrap().nspread, 10);
        assert_eq!(setup_spreader(1e-14, 2.0).unwrap().nspread, 15);
    }

    #[test]
    fn eps_below_table_floor_is_rejected() {
        let err = setup_spreader(1e-30, 2.0).unwrap_err();
        assert_eq!(err.code(), 1);
        assert!(setup_spreader(1e-16, 2.0).is_err());
        assert!(setup_spreader(1e-15, 2.0).is_ok());
    }

    #[test]
    fn unsupported_sigma_is_rejected() {
        assert_eq!(setup_spreader(1e-6, 1.0).unwrap_err().code(), 7);
        assert_eq!(setup_spreader(1e-6, 1.5).unwrap_err().code(), 7);
        assert!(setup_spreader(1e-6, 1.25).is_ok());
    }

    #[test]
    fn kernel_is_even_peaked_and_compact() {
        let params = setup_spreader(1e-6, 2.0).unwrap();
        let hw = params.es_halfwidth;
        let peak: f64 = evaluate_kernel(0.0f64, &params);
        assert!(peak > 0.0);
        for i in 1..10 {
            let x = hw * i as f64 / 10.0;
            let a: f64 = evaluate_kernel(x, &params);
            let b: f64 = evaluate_kernel(-x, &params);
            assert_eq!(a, b, "kernel not even at {x}");
            assert!(a < peak);
        }
        assert_eq!(evaluate_kernel(hw, &params), 0.0);
        assert_eq!(evaluate_kernel(hw + 1.0, &params), 0.0);
    }
}
