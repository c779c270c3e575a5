/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core tensor primitives shared by the tephra crates
//!
//! This crate provides the small set of building blocks the kernel
//! crates are written against
//!
//! It currently contains
//!
//! - A type-erased, alignment-aware storage buffer for tensor data
//! - A rank-aware [`Tensor`](crate::tensor::Tensor) type in `(batch, channel, height, width)`
//!   layout for rank-4 data
//! - Element type information shared by tensors and kernels
//! - The [`KernelTrait`](crate::kernel::KernelTrait) implemented by every
//!   compute kernel, CPU resident or otherwise
#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod datatype;
pub mod errors;
pub mod kernel;
pub mod storage;
pub mod tensor;
