/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Tensor element type information and manipulations

use std::any::TypeId;

use bytemuck::Pod;

/// The underlying representation of one tensor element
///
/// This represents the minimum rust type that can be used
/// to store tensor data, required by the `Storage` struct
/// to tag what a buffer was created with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum DataType {
    /// Tensors represented using a [`u8`] as their
    /// underlying element storage
    U8,
    /// Tensors represented using a [`u16`] as their
    /// underlying element storage
    U16,
    /// Tensors represented using an [`f32`] as their
    /// underlying element storage
    F32,
    /// Tensors represented using an [`i32`] as their
    /// underlying element storage.
    ///
    /// Mainly present for auxiliary tensors carrying shape
    /// information, kernels do not blend in this type
    I32
}

impl DataType {
    /// Return the number of bytes a single element
    /// of this type occupies
    ///
    /// # Example
    /// ```
    /// use tephra_core::datatype::DataType;
    /// assert_eq!(DataType::U16.size_of(), 2);
    /// ```
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 | Self::I32 => 4
        }
    }

    /// Return the [`TypeId`] of the rust type backing
    /// this element type
    #[must_use]
    pub fn type_id(self) -> TypeId {
        match self {
            Self::U8 => TypeId::of::<u8>(),
            Self::U16 => TypeId::of::<u16>(),
            Self::F32 => TypeId::of::<f32>(),
            Self::I32 => TypeId::of::<i32>()
        }
    }
}

/// Maps a rust numeric type to its [`DataType`] tag
///
/// Implemented for the types a tensor can store, it allows
/// generic constructors and accessors to recover the dynamic
/// element tag from the static type.
pub trait TensorType: Default + Copy + Pod + 'static {
    /// The dynamic tag matching this type
    fn data_type() -> DataType;
}

macro_rules! tensor_type_for {
    ($type:tt, $variant:tt) => {
        impl TensorType for $type {
            fn data_type() -> DataType {
                DataType::$variant
            }
        }
    };
}

tensor_type_for!(u8, U8);
tensor_type_for!(u16, U16);
tensor_type_for!(f32, F32);
tensor_type_for!(i32, I32);
