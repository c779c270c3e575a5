/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! End-to-end tests exercising the public tephra API

#![allow(unused_imports, unused)]

use tephra_core::datatype::{DataType, TensorType};
use tephra_core::tensor::Tensor;

mod resize_bilinear;

/// Build a rank-4 tensor where every element encodes its own
/// (batch, channel, row, column) position, handy for checking that
/// planes never bleed into each other
pub fn position_coded_tensor(batch: usize, channels: usize, height: usize, width: usize) -> Tensor {
    let mut data = Vec::with_capacity(batch * channels * height * width);

    for b in 0..batch {
        for c in 0..channels {
            for y in 0..height {
                for x in 0..width {
                    data.push((b * 1000 + c * 100 + y * 10 + x) as f32);
                }
            }
        }
    }

    Tensor::from_slice(&data, &[batch, channels, height, width]).unwrap()
}
