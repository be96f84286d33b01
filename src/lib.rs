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
#![allow(clippy::too_many_arguments)]

//! Two-dimensional non-uniform fast Fourier transforms.
//!
//! Evaluates, to a user-requested relative precision, the three
//! canonical transforms between non-equispaced points in the plane
//! and a lattice of Fourier modes:
//!
//! - [nufft2d1] (adjoint): non-uniform points to a uniform mode grid;
//! - [nufft2d2] (forward): a uniform mode grid to non-uniform points;
//! - [nufft2d3] (general): non-uniform points to non-uniform
//!   frequencies;
//!
//! plus [nufft2d1_many] / [nufft2d2_many] batched forms sharing one
//! geometry across many strength vectors.
//!
//! Each transform spreads through a precision-tuned "exp-sqrt" kernel
//! onto an oversampled grid, runs one uniform FFT there, and divides
//! out the kernel's Fourier coefficients. Transforms are generic over
//! [f32] and [f64] through [NufftSample].

mod deconvolve;
mod driver;
mod err;
mod fft;
mod fseries;
mod gridsize;
mod kernel;
mod opts;
mod quad;
mod spread;

pub use driver::{nufft2d1, nufft2d1_many, nufft2d2, nufft2d2_many, nufft2d3};
pub use err::NufftError;
pub use gridsize::MAX_NF;
pub use opts::{ModeOrder, NufftOpts, SpreadSort};

use num_traits::{Float, FloatConst, NumAssign};
use rustfft::FftNum;

/// Scalar precision of a transform. A build is homogeneous: every
/// coordinate, strength, kernel table and FFT plan shares the one
/// width. Implemented for [f32] and [f64].
pub trait NufftSample: Float + FloatConst + FftNum + Default + NumAssign {}

impl NufftSample for f32 {}
impl NufftSample for f64 {}
