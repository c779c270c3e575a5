/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Numeric helpers for generic kernels
//!
//! Kernels blend in `f32` whatever the element type of the tensor is,
//! widening samples on read and narrowing the result on write.
//! [`NumOps`] carries the narrowing conversion plus the type bounds.

pub trait NumOps<T> {
    fn max_val() -> T;

    fn min_val() -> T;

    /// Convert a blended `f32` value back into this type
    ///
    /// Integer types saturate at their bounds and truncate
    /// the fractional part.
    fn from_f32(value: f32) -> T;
}

macro_rules! numops_for_int {
    ($int:tt) => {
        impl NumOps<$int> for $int {
            fn max_val() -> $int {
                $int::MAX
            }

            fn min_val() -> $int {
                $int::MIN
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn from_f32(value: f32) -> $int {
                // float to int `as` casts saturate
                value as $int
            }
        }
    };
}

numops_for_int!(u8);
numops_for_int!(u16);

impl NumOps<f32> for f32 {
    fn max_val() -> f32 {
        f32::MAX
    }

    fn min_val() -> f32 {
        f32::MIN
    }

    fn from_f32(value: f32) -> f32 {
        value
    }
}
