/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors shared by tensor kernels

use std::fmt::{Debug, Formatter};

use crate::datatype::DataType;
use crate::storage::StorageErrors;

/// All errors a tensor kernel can report
///
/// Every variant is a caller configuration error, kernels are pure
/// computations and never fail transiently. Errors are raised during
/// shape resolution, before the destination buffer is touched.
pub enum TensorErrors {
    /// A requested or resolved configuration value is unusable,
    /// e.g. an output dimension of zero
    InvalidConfiguration(&'static str),
    /// A kernel running in dynamic-size mode was handed a missing
    /// or malformed auxiliary dimensions tensor
    InvalidDimsTensor(&'static str),
    /// The kernel has no implementation for the element type
    /// of the tensor it was asked to run on
    KernelNotImplemented(&'static str, DataType),
    /// A tensor shape does not match the data it is supposed to describe
    DimensionMismatch(usize, usize),
    /// A typed view into backing storage could not be produced
    Storage(StorageErrors)
}

impl Debug for TensorErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfiguration(reason) => {
                writeln!(f, "invalid configuration: {reason}")
            }
            Self::InvalidDimsTensor(reason) => {
                writeln!(f, "invalid dims tensor: {reason}")
            }
            Self::KernelNotImplemented(kernel, dtype) => {
                writeln!(
                    f,
                    "the kernel {kernel} is not implemented for data type {dtype:?}"
                )
            }
            Self::DimensionMismatch(expected, found) => {
                writeln!(
                    f,
                    "shape describes {expected} elements but data contains {found}"
                )
            }
            Self::Storage(ref error) => {
                writeln!(f, "storage error: {error:?}")
            }
        }
    }
}

impl From<StorageErrors> for TensorErrors {
    fn from(error: StorageErrors) -> Self {
        TensorErrors::Storage(error)
    }
}
