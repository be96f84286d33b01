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

/// Ordering convention for the Fourier-mode axes of type-1 output and
/// type-2 input arrays.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
pub enum ModeOrder {
    /// Zero frequency at the centre: modes run `-m/2 ..= (m-1)/2` in
    /// increasing order along each axis.
    #[default]
    Cmcl,
    /// FFT-native unshifted layout: `0 ..= (m-1)/2` then `-m/2 ..= -1`.
    Fft,
}

/// Whether the spreader reorders sources for cache locality before
/// scattering or gathering.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
pub enum SpreadSort {
    Off,
    On,
    /// Sort only when the point count is large relative to the grid;
    /// the decision is deterministic in the problem sizes.
    #[default]
    Auto,
}

/// Options shared by every transform entry point.
#[derive(Debug, Clone)]
pub struct NufftOpts {
    /// 0 silent, 1 per-stage timings and sizes, 2 extra internals; all
    /// emitted through the `log` facade.
    pub debug: i32,
    /// Forwarded to the spreader's own diagnostics.
    pub spread_debug: i32,
    pub spread_sort: SpreadSort,
    /// Validate that every coordinate lies in the admissible range
    /// before spreading.
    pub chkbnds: bool,
    pub modeord: ModeOrder,
    /// Upsampling factor sigma, 2.0 (default) or 1.25 (low-memory).
    pub upsampfac: f64,
    /// Advisory plan-flag word forwarded verbatim to the FFT adapter.
    pub fftw: u32,
    /// Batched dispatch: `true` reuses one single-plane plan per
    /// dataset, `false` runs a multi-plane FFT over one chunk of
    /// datasets per worker thread.
    pub many_seq: bool,
    /// Worker threads; 0 reads the process concurrency probe.
    pub nthreads: usize,
}

impl Default for NufftOpts {
    fn default() -> Self {
        NufftOpts {
            debug: 0,
            spread_debug: 0,
            spread_sort: SpreadSort::Auto,
            chkbnds: true,
            modeord: ModeOrder::Cmcl,
            upsampfac: 2.0,
            fftw: 0,
            many_seq: false,
            nthreads: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behaviour() {
        let opts = NufftOpts::default();
        assert_eq!(opts.modeord, ModeOrder::Cmcl);
        assert_eq!(opts.spread_sort, SpreadSort::Auto);
        assert_eq!(opts.upsampfac, 2.0);
        assert!(opts.chkbnds);
        assert!(!opts.many_seq);
        assert_eq!(opts.nthreads, 0);
    }
}
