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
use crate::err::{try_vec, NufftError};
use crate::NufftSample;
use novtb::{ParallelZonedIterator, TbSliceMut};
use num_complex::Complex;
use rustfft::{Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// In-place 2D complex-to-complex transform over one or more
/// contiguous `nf1 x nf2` planes, built from the external uniform 1D
/// FFT primitive as a row pass, a transpose, a column pass and a
/// transpose back.
///
/// Plan resources are released on drop.
pub(crate) struct Fft2dPlan<T> {
    row_fft: Arc<dyn Fft<T>>,
    col_fft: Arc<dyn Fft<T>>,
    nf1: usize,
    nf2: usize,
    howmany: usize,
    threads: usize,
    /// Advisory planner word carried from the options record; the
    /// current primitive has no tunable planning and only records it.
    #[allow(dead_code)]
    plan_flags: u32,
}

impl<T: NufftSample> Fft2dPlan<T> {
    /// Plans a single-plane transform. A non-negative `fftsign` means
    /// the transform accumulates `exp(+i ...)`, which is the
    /// primitive's unnormalised inverse direction.
    pub(crate) fn plan(
        nf1: usize,
        nf2: usize,
        fftsign: i32,
        plan_flags: u32,
        threads: usize,
    ) -> Result<Fft2dPlan<T>, NufftError> {
        Fft2dPlan::plan_many(nf1, nf2, 1, fftsign, plan_flags, threads)
    }

    /// Plans `howmany` planes of identical size laid out contiguously
    /// with stride `nf1 * nf2`.
    pub(crate) fn plan_many(
        nf1: usize,
        nf2: usize,
        howmany: usize,
        fftsign: i32,
        plan_flags: u32,
        threads: usize,
    ) -> Result<Fft2dPlan<T>, NufftError> {
        let direction = if fftsign >= 0 {
            FftDirection::Inverse
        } else {
            FftDirection::Forward
        };
        let mut planner = FftPlanner::new();
        let row_fft = planner.plan_fft(nf1, direction);
        let col_fft = planner.plan_fft(nf2, direction);
        Ok(Fft2dPlan {
            row_fft,
            col_fft,
            nf1,
            nf2,
            howmany,
            threads: threads.max(1),
            plan_flags,
        })
    }

    /// Executes the planned transform on `fw`, which must hold exactly
    /// the planned planes.
    pub(crate) fn execute(&self, fw: &mut [Complex<T>]) -> Result<(), NufftError> {
        let plane = self.nf1 * self.nf2;
        if fw.len() != plane * self.howmany {
            return Err(NufftError::MismatchedLengths(fw.len(), plane * self.howmany));
        }
        if plane == 0 {
            return Ok(());
        }

        let pool = (self.threads > 1).then(|| novtb::ThreadPool::new(self.threads));

        // rows of every plane are contiguous, one pass over the lot
        if let Some(pool) = &pool {
            fw.tb_par_chunks_exact_mut(self.nf1).for_each(pool, |row| {
                self.row_fft.process(row);
            });
        } else {
            let mut scratch =
                try_vec![Complex::<T>::default(); self.row_fft.get_inplace_scratch_len()];
            self.row_fft.process_with_scratch(fw, &mut scratch);
        }

        let mut transposed = try_vec![Complex::<T>::default(); plane];
        let mut col_scratch =
            try_vec![Complex::<T>::default(); self.col_fft.get_inplace_scratch_len()];
        for chunk in fw.chunks_exact_mut(plane) {
            transpose(chunk, &mut transposed, self.nf1, self.nf2);
            if let Some(pool) = &pool {
                transposed
                    .tb_par_chunks_exact_mut(self.nf2)
                    .for_each(pool, |column| {
                        self.col_fft.process(column);
                    });
            } else {
                self.col_fft
                    .process_with_scratch(&mut transposed, &mut col_scratch);
            }
            transpose(&transposed, chunk, self.nf2, self.nf1);
        }
        Ok(())
    }
}

/// Blocked out-of-place transpose of a `width x height` row-major
/// matrix into `height x width`.
fn transpose<T: Copy>(input: &[T], output: &mut [T], width: usize, height: usize) {
    const BLOCK: usize = 32;
    for block_y in (0..height).step_by(BLOCK) {
        let y_end = (block_y + BLOCK).min(height);
        for block_x in (0..width).step_by(BLOCK) {
            let x_end = (block_x + BLOCK).min(width);
            for y in block_y..y_end {
                for x in block_x..x_end {
                    output[x * height + y] = input[y * width + x];
                }
            }
        }
    }
}
