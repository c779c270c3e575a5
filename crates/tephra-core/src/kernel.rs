/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The trait implemented by every compute kernel
//!
//! A kernel is a stateless transformation from an input tensor (plus an
//! optional auxiliary tensor) to an output tensor. Configuration lives in
//! the kernel struct itself and is immutable after construction, so one
//! kernel instance can be applied to any number of tensors.
//!
//! Alternate backends (e.g. an accelerator resident implementation of the
//! same operation) implement this same trait; picking which implementation
//! services a call is the caller's device routing concern, not something a
//! kernel branches on internally.

use crate::datatype::DataType;
use crate::errors::TensorErrors;
use crate::tensor::Tensor;

/// A single tensor compute kernel
pub trait KernelTrait {
    /// The name of the kernel, used in error reporting and logging
    fn name(&self) -> &'static str;

    /// Element types this kernel has an implementation for
    fn supported_types(&self) -> &'static [DataType];

    /// Execute the kernel without checking type support
    ///
    /// Prefer [`execute`](Self::execute) which validates the input
    /// element type first.
    fn execute_impl(
        &self, input: &Tensor, aux: Option<&Tensor>, output: &mut Tensor
    ) -> Result<(), TensorErrors>;

    /// Execute the kernel on `input`, writing the result into `output`
    ///
    /// `aux` carries call-time side information some kernels need,
    /// e.g. a dynamically supplied output shape.
    ///
    /// # Errors
    /// Returns an error if the input element type is not in
    /// [`supported_types`](Self::supported_types) or if the kernel
    /// rejects its configuration during shape resolution.
    fn execute(
        &self, input: &Tensor, aux: Option<&Tensor>, output: &mut Tensor
    ) -> Result<(), TensorErrors> {
        if !self.supported_types().contains(&input.data_type()) {
            return Err(TensorErrors::KernelNotImplemented(
                self.name(),
                input.data_type()
            ));
        }

        self.execute_impl(input, aux, output)
    }
}
