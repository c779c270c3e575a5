/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Bilinear resize of a `(batch, channel, height, width)` tensor
//!
//! # Algorithm
//!
//! Bilinear interpolation is separable, so the fractional source
//! coordinate of every output row and column can be computed once per
//! axis instead of once per pixel. For each axis we build a table of
//! [`CachedInterpolation`] records holding the two source indices that
//! straddle an output coordinate and the blend fraction between them:
//!
//! ```text
//!  source axis   0     1     2     3
//!                |-----|--x--|-----|
//!                      ▲  ▲
//!                  lower  src = i * scale, lerp = src - lower
//! ```
//!
//! The resize loop then only gathers four corner samples per output
//! pixel and blends them, first along x for the two source rows, then
//! along y:
//!
//! ```text
//!  top_left ────┬──── top_right
//!               │ x_lerp
//!            top│
//!               ├ y_lerp ──► result
//!         bottom│
//!               │ x_lerp
//!  bottom_left ─┴──── bottom_right
//! ```
//!
//! Every (batch, channel) pair owns disjoint input and output planes,
//! so planes are resized in parallel when the `threads` feature is on.

use log::trace;
use tephra_core::datatype::{DataType, TensorType};
use tephra_core::errors::TensorErrors;
use tephra_core::kernel::KernelTrait;
use tephra_core::tensor::Tensor;

use crate::traits::NumOps;


/// Per-output-coordinate interpolation record for one axis
///
/// `lower` and `upper` are the two source indices straddling the
/// fractional source coordinate, `lerp` is the blend fraction between
/// them, always in `[0, 1)`. `upper` is clamped to the last valid
/// source index, so `upper - lower` is either 0 or 1.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CachedInterpolation {
    /// Lower source index used in the interpolation
    pub lower: usize,
    /// Upper source index used in the interpolation
    pub upper: usize,
    /// 1-D linear interpolation fraction (see:
    /// <https://en.wikipedia.org/wiki/Bilinear_interpolation>)
    pub lerp:  f32
}

/// How the kernel learns its output extent
#[derive(Copy, Clone, Debug)]
pub enum OutputSize {
    /// `(height, width)` fixed when the kernel is constructed
    Static(usize, usize),
    /// Read `(height, width)` from a rank-1, two element `i32`
    /// tensor supplied at call time
    FromTensor
}

/// Resize a tensor to a new spatial extent using bilinear interpolation
///
/// The input must be rank 4 in `(batch, channel, height, width)` layout.
/// The output tensor is resized to match; if the requested extent equals
/// the input extent the data is copied through untouched.
///
/// # Example
/// Upscale a 2x2 plane to 4x4
/// ```
/// use tephra_core::kernel::KernelTrait;
/// use tephra_core::tensor::Tensor;
/// use tephra_procs::resize_bilinear::ResizeBilinear;
///
/// let input = Tensor::from_slice(&[1.0_f32, 2.0, 3.0, 4.0], &[1, 1, 2, 2]).unwrap();
/// let mut output = Tensor::zeroed(input.data_type(), &[0; 4]);
///
/// ResizeBilinear::new(4, 4, false).execute(&input, None, &mut output).unwrap();
///
/// assert_eq!(output.shape(), &[1, 1, 4, 4]);
/// // corners stay exact
/// assert_eq!(output.data::<f32>().unwrap()[0], 1.0);
/// ```
pub struct ResizeBilinear {
    size:          OutputSize,
    align_corners: bool
}

impl ResizeBilinear {
    /// Create a resize kernel with a fixed output extent
    ///
    /// # Arguments
    /// - `out_height`: Height of the resized output
    /// - `out_width`: Width of the resized output
    /// - `align_corners`: When true, the first and last samples of the
    ///   input and output are pinned onto each other; otherwise samples
    ///   are spaced uniformly across the full input extent
    #[must_use]
    pub fn new(out_height: usize, out_width: usize, align_corners: bool) -> ResizeBilinear {
        ResizeBilinear {
            size: OutputSize::Static(out_height, out_width),
            align_corners
        }
    }

    /// Create a resize kernel that reads its output extent from an
    /// auxiliary dims tensor at call time
    #[must_use]
    pub fn dynamic(align_corners: bool) -> ResizeBilinear {
        ResizeBilinear {
            size: OutputSize::FromTensor,
            align_corners
        }
    }

    /// Resolve the effective output `(height, width)` for one call
    #[allow(clippy::cast_sign_loss)]
    fn output_size(&self, resize_dims: Option<&Tensor>) -> Result<(usize, usize), TensorErrors> {
        let (out_height, out_width) = match self.size {
            OutputSize::Static(height, width) => (height, width),
            OutputSize::FromTensor => {
                let Some(dims) = resize_dims else {
                    return Err(TensorErrors::InvalidDimsTensor(
                        "dynamic output size requested but no dims tensor was provided"
                    ));
                };
                if dims.rank() != 1 {
                    return Err(TensorErrors::InvalidDimsTensor(
                        "the dims tensor must be rank 1"
                    ));
                }
                if dims.num_elements() != 2 {
                    return Err(TensorErrors::InvalidDimsTensor(
                        "the dims tensor must hold exactly (height, width)"
                    ));
                }
                let dims_data = dims.data::<i32>().map_err(|_| {
                    TensorErrors::InvalidDimsTensor("the dims tensor must hold i32 values")
                })?;

                if dims_data[0] <= 0 || dims_data[1] <= 0 {
                    return Err(TensorErrors::InvalidConfiguration(
                        "resolved output dimensions must be positive"
                    ));
                }
                (dims_data[0] as usize, dims_data[1] as usize)
            }
        };

        if out_height == 0 || out_width == 0 {
            return Err(TensorErrors::InvalidConfiguration(
                "output dimensions must be positive"
            ));
        }

        Ok((out_height, out_width))
    }
}

impl KernelTrait for ResizeBilinear {
    fn name(&self) -> &'static str {
        "resize-bilinear"
    }

    fn supported_types(&self) -> &'static [DataType] {
        &[DataType::U8, DataType::U16, DataType::F32]
    }

    fn execute_impl(
        &self, input: &Tensor, aux: Option<&Tensor>, output: &mut Tensor
    ) -> Result<(), TensorErrors> {
        if input.rank() != 4 {
            return Err(TensorErrors::InvalidConfiguration(
                "resize-bilinear expects a rank 4 (batch, channel, height, width) input"
            ));
        }
        if output.data_type() != input.data_type() {
            return Err(TensorErrors::InvalidConfiguration(
                "the output element type does not match the input"
            ));
        }

        let (batch, channels) = (input.dim(0), input.dim(1));
        let (in_height, in_width) = (input.dim(2), input.dim(3));

        if in_height == 0 || in_width == 0 {
            return Err(TensorErrors::InvalidConfiguration(
                "the input spatial dimensions are empty"
            ));
        }

        // all validation happens above this point, a failing call
        // leaves the output tensor untouched
        let (out_height, out_width) = self.output_size(aux)?;

        trace!(
            "resize-bilinear: {in_height}x{in_width} -> {out_height}x{out_width}, align_corners: {}",
            self.align_corners
        );

        output.resize(&[batch, channels, out_height, out_width]);

        match input.data_type() {
            DataType::U8 => resize_typed::<u8>(input, output, self.align_corners),
            DataType::U16 => resize_typed::<u16>(input, output, self.align_corners),
            DataType::F32 => resize_typed::<f32>(input, output, self.align_corners),
            d => Err(TensorErrors::KernelNotImplemented(self.name(), d))
        }
    }
}

/// Shape-resolved resize of one tensor, monomorphized per element type
fn resize_typed<T>(
    input: &Tensor, output: &mut Tensor, align_corners: bool
) -> Result<(), TensorErrors>
where
    T: TensorType + NumOps<T> + Send + Sync,
    f32: From<T>
{
    let (in_height, in_width) = (input.dim(2), input.dim(3));
    let (out_height, out_width) = (output.dim(2), output.dim(3));

    let in_data = input.data::<T>()?;
    let out_data = output.data_mut::<T>()?;

    if out_height == in_height && out_width == in_width {
        // same spatial extent, resampling would be the identity
        out_data.copy_from_slice(in_data);
        return Ok(());
    }

    let height_scale = calculate_resize_scale(in_height, out_height, align_corners);
    let width_scale = calculate_resize_scale(in_width, out_width, align_corners);

    trace!("resize-bilinear: scale h: {height_scale} w: {width_scale}");

    // compute the cached interpolation weights on the x and y dimensions
    let ys = compute_interpolation_weights(out_height, in_height, height_scale);
    let xs = compute_interpolation_weights(out_width, in_width, width_scale);

    resize_image(
        in_data,
        input.dim(0),
        in_height,
        in_width,
        out_height,
        out_width,
        input.dim(1),
        &xs,
        &ys,
        out_data
    );

    Ok(())
}

/// Compute the per-axis ratio between source and destination extents
///
/// With `align_corners` and more than one output sample, the first and
/// last samples of both extents map onto each other exactly; otherwise
/// samples are spaced uniformly across the full input extent.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn calculate_resize_scale(in_size: usize, out_size: usize, align_corners: bool) -> f32 {
    if align_corners && out_size > 1 {
        (in_size - 1) as f32 / (out_size - 1) as f32
    } else {
        in_size as f32 / out_size as f32
    }
}

/// Build the interpolation weight table for one axis
///
/// Returns `out_size + 1` records; the last one is an all-zero sentinel
/// that keeps lookahead reads in the hot loop in bounds and is never
/// used as a real sample.
///
/// `upper` is clamped to the last valid source index while `lower` is
/// not; downstream tie-breaking depends on that asymmetry.
#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn compute_interpolation_weights(
    out_size: usize, in_size: usize, scale: f32
) -> Vec<CachedInterpolation> {
    let mut weights = vec![CachedInterpolation::default(); out_size + 1];

    for (i, weight) in weights[..out_size].iter_mut().enumerate() {
        let src = i as f32 * scale;
        // src >= 0 so truncation is floor
        let lower = src as usize;

        weight.lower = lower;
        weight.upper = (lower + 1).min(in_size - 1);
        weight.lerp = src - lower as f32;
    }

    weights
}

/// Blend four neighboring samples into one output value
///
/// Separable linear interpolation, first along x for the top and bottom
/// source rows independently, then along y between the two results.
#[inline]
#[must_use]
pub fn compute_lerp(
    top_left: f32, top_right: f32, bottom_left: f32, bottom_right: f32, x_lerp: f32, y_lerp: f32
) -> f32 {
    let top = top_left + (top_right - top_left) * x_lerp;
    let bottom = bottom_left + (bottom_right - bottom_left) * x_lerp;

    top + (bottom - top) * y_lerp
}

/// Resize every `(batch, channel)` plane of `input` into `output`
/// using precomputed axis weight tables
///
/// # Arguments
/// - `input`: Source samples, `batch * channels` contiguous planes of
///   `in_height * in_width` values
/// - `xs`: Width-axis weight table from [`compute_interpolation_weights`]
/// - `ys`: Height-axis weight table from [`compute_interpolation_weights`]
/// - `output`: Destination, `batch * channels` contiguous planes of
///   `out_height * out_width` values
///
/// Both weight tables must be fully built before this is called; they
/// are shared read-only across all planes, and each plane writes a
/// disjoint region of `output`, so no synchronization is needed and the
/// result does not depend on how many threads service the planes.
#[allow(clippy::too_many_arguments)]
pub fn resize_image<T>(
    input: &[T], batch: usize, in_height: usize, in_width: usize, out_height: usize,
    out_width: usize, channels: usize, xs: &[CachedInterpolation], ys: &[CachedInterpolation],
    output: &mut [T]
) where
    T: Copy + NumOps<T> + Send + Sync,
    f32: From<T>
{
    let in_plane_size = in_height * in_width;
    let out_plane_size = out_height * out_width;

    debug_assert_eq!(input.len(), batch * channels * in_plane_size);
    debug_assert_eq!(output.len(), batch * channels * out_plane_size);

    // every (batch, channel) pair owns one input plane and one output
    // plane, making the grid trivially data parallel
    let planes = input
        .chunks_exact(in_plane_size)
        .zip(output.chunks_exact_mut(out_plane_size));

    #[cfg(feature = "threads")]
    {
        std::thread::scope(|s| {
            for (in_plane, out_plane) in planes {
                s.spawn(move || resize_plane(in_plane, out_plane, in_width, out_width, xs, ys));
            }
        });
    }

    #[cfg(not(feature = "threads"))]
    {
        for (in_plane, out_plane) in planes {
            resize_plane(in_plane, out_plane, in_width, out_width, xs, ys);
        }
    }
}

/// Resize a single channel plane
fn resize_plane<T>(
    input: &[T], output: &mut [T], in_width: usize, out_width: usize,
    xs: &[CachedInterpolation], ys: &[CachedInterpolation]
) where
    T: Copy + NumOps<T>,
    f32: From<T>
{
    // zipping against out_height rows / out_width pixels drops the
    // trailing sentinel record of each weight table
    for (y_weight, out_row) in ys.iter().zip(output.chunks_exact_mut(out_width)) {
        // the two source rows contributing to this output row
        let top_row = &input[y_weight.lower * in_width..(y_weight.lower + 1) * in_width];
        let bottom_row = &input[y_weight.upper * in_width..(y_weight.upper + 1) * in_width];
        let y_lerp = y_weight.lerp;

        for (x_weight, out_px) in xs.iter().zip(out_row.iter_mut()) {
            let top_left = f32::from(top_row[x_weight.lower]);
            let top_right = f32::from(top_row[x_weight.upper]);
            let bottom_left = f32::from(bottom_row[x_weight.lower]);
            let bottom_right = f32::from(bottom_row[x_weight.upper]);

            *out_px = T::from_f32(compute_lerp(
                top_left,
                top_right,
                bottom_left,
                bottom_right,
                x_weight.lerp,
                y_lerp
            ));
        }
    }
}
