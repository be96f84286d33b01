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
use std::error::Error;
use std::fmt::Formatter;

#[derive(Clone, Debug)]
pub enum NufftError {
    /// Requested precision is below the kernel-table floor.
    EpsTooSmall(f64),
    /// The oversampled grid `nf1*nf2` exceeds [crate::MAX_NF].
    MaxAllocExceeded(u64),
    /// A non-uniform coordinate is outside the admissible range;
    /// carries the index of the first offending point.
    SpreadBounds(usize),
    /// The bin-sort permutation failed its internal consistency check.
    SpreadSort,
    /// The spreader was driven in the wrong direction.
    SpreadDir(i32),
    /// The upsampling factor is outside the supported set {2.0, 1.25}.
    UpsampfacTooSmall(f64),
    /// A batched transform was requested with no datasets.
    NdataNotValid(usize),
    OutOfMemory(usize),
    MismatchedLengths(usize, usize),
}

impl NufftError {
    /// Stable integer code for callers that track failures numerically.
    pub fn code(&self) -> i32 {
        match self {
            NufftError::EpsTooSmall(_) => 1,
            NufftError::MaxAllocExceeded(_) => 2,
            NufftError::SpreadBounds(_) => 4,
            NufftError::SpreadSort => 5,
            NufftError::SpreadDir(_) => 6,
            NufftError::UpsampfacTooSmall(_) => 7,
            NufftError::NdataNotValid(_) => 9,
            NufftError::OutOfMemory(_) => 10,
            NufftError::MismatchedLengths(_, _) => 11,
        }
    }
}

impl Error for NufftError {}

impl std::fmt::Display for NufftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NufftError::EpsTooSmall(eps) => f.write_fmt(format_args!(
                "Requested precision {eps:.3e} is below the minimum the spreading kernel supports"
            )),
            NufftError::MaxAllocExceeded(nf) => f.write_fmt(format_args!(
                "Oversampled grid of {nf} points exceeds the maximum admissible working size"
            )),
            NufftError::SpreadBounds(j) => f.write_fmt(format_args!(
                "Non-uniform point {j} lies outside the admissible coordinate range"
            )),
            NufftError::SpreadSort => f.write_str("Bin-sort produced an inconsistent permutation"),
            NufftError::SpreadDir(dir) => {
                f.write_fmt(format_args!("Spreader invoked with invalid direction {dir}"))
            }
            NufftError::UpsampfacTooSmall(sigma) => f.write_fmt(format_args!(
                "Upsampling factor {sigma} is not supported, expected 2.0 or 1.25"
            )),
            NufftError::NdataNotValid(ndata) => f.write_fmt(format_args!(
                "Batched transform needs at least 1 dataset, got {ndata}"
            )),
            NufftError::OutOfMemory(length) => {
                f.write_fmt(format_args!("Cannot allocate {length} elements to vector"))
            }
            NufftError::MismatchedLengths(got, expected) => f.write_fmt(format_args!(
                "Array length {got} disagrees with the expected {expected}"
            )),
        }
    }
}

macro_rules! try_vec {
    () => {
        Vec::new()
    };
    ($elem:expr; $n:expr) => {{
        let mut v = Vec::new();
        v.try_reserve_exact($n)
            .map_err(|_| crate::err::NufftError::OutOfMemory($n))?;
        v.resize($n, $elem);
        v
    }};
}

pub(crate) use try_vec;

#[cfg(test)]
mod tests {
    use super::NufftError;

    #[test]
    fn codes_are_stable() {
        assert_eq!(NufftError::EpsTooSmall(1e-30).code(), 1);
        assert_eq!(NufftError::MaxAllocExceeded(u64::MAX).code(), 2);
        assert_eq!(NufftError::SpreadBounds(0).code(), 4);
        assert_eq!(NufftError::UpsampfacTooSmall(1.0).code(), 7);
        assert_eq!(NufftError::NdataNotValid(0).code(), 9);
    }
}
