/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tensor processing kernels for `tephra`
//!
//! This implements the compute kernels used by the inference pipeline,
//! operating on the tensor types defined by `tephra-core`.
//!
//! Every kernel implements the `KernelTrait` defined by tephra-core.
//!
//! # Example
//! - Resize a single-channel tensor to 4x4
//! ```
//! use tephra_core::kernel::KernelTrait;
//! use tephra_core::tensor::Tensor;
//! use tephra_procs::resize_bilinear::ResizeBilinear;
//!
//! let input = Tensor::from_slice(&[1.0_f32, 2.0, 3.0, 4.0], &[1, 1, 2, 2]).unwrap();
//! let mut output = Tensor::zeroed(input.data_type(), &[0; 4]);
//!
//! let resize = ResizeBilinear::new(4, 4, false);
//! resize.execute(&input, None, &mut output).unwrap();
//! ```

// Benchmark support needs nightly
#![cfg_attr(feature = "benchmarks", feature(test))]
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod resize_bilinear;
pub mod traits;
