/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use tephra_core::datatype::DataType;
use tephra_core::errors::TensorErrors;
use tephra_core::kernel::KernelTrait;
use tephra_core::tensor::Tensor;
use tephra_procs::resize_bilinear::ResizeBilinear;

use crate::position_coded_tensor;

/// Resizing to the input extent must reproduce the input buffer
/// exactly, for every supported element type
#[test]
fn identity_resize_roundtrips_all_types() {
    use nanorand::Rng;

    let mut rng = nanorand::WyRand::new();
    let shape = [2, 3, 8, 6];
    let resize = ResizeBilinear::new(8, 6, false);

    let mut u8_data = vec![0_u8; 2 * 3 * 8 * 6];
    rng.fill(&mut u8_data);
    let input = Tensor::from_slice(&u8_data, &shape).unwrap();
    let mut output = Tensor::zeroed(DataType::U8, &[0; 4]);
    resize.execute(&input, None, &mut output).unwrap();
    assert_eq!(output.data::<u8>().unwrap(), u8_data);

    let mut u16_data = vec![0_u16; 2 * 3 * 8 * 6];
    rng.fill(&mut u16_data);
    let input = Tensor::from_slice(&u16_data, &shape).unwrap();
    let mut output = Tensor::zeroed(DataType::U16, &[0; 4]);
    resize.execute(&input, None, &mut output).unwrap();
    assert_eq!(output.data::<u16>().unwrap(), u16_data);

    let mut f32_data = vec![0.0_f32; 2 * 3 * 8 * 6];
    rng.fill(&mut f32_data);
    let input = Tensor::from_slice(&f32_data, &shape).unwrap();
    let mut output = Tensor::zeroed(DataType::F32, &[0; 4]);
    resize.execute(&input, None, &mut output).unwrap();
    assert_eq!(output.data::<f32>().unwrap(), f32_data);
}

/// Each (batch, channel) plane must be resized from its own source
/// plane only
#[test]
fn planes_do_not_bleed() {
    let input = position_coded_tensor(2, 3, 4, 4);
    let mut output = Tensor::zeroed(DataType::F32, &[0; 4]);

    ResizeBilinear::new(2, 2, false)
        .execute(&input, None, &mut output)
        .unwrap();

    let out_data = output.data::<f32>().unwrap();

    for b in 0..2 {
        for c in 0..3 {
            let plane = &out_data[(b * 3 + c) * 4..(b * 3 + c + 1) * 4];
            let base = (b * 1000 + c * 100) as f32;

            for value in plane {
                // every interpolated value stays inside its source
                // plane's coding range
                assert!(
                    *value >= base && *value < base + 100.0,
                    "plane (b:{b} c:{c}) read from a foreign plane: {value}"
                );
            }
        }
    }
}

/// Dynamic mode resolves the output extent from the aux tensor and
/// produces the same result as a statically configured kernel
#[test]
fn dynamic_mode_matches_static() {
    let input = position_coded_tensor(1, 2, 5, 7);

    let mut static_out = Tensor::zeroed(DataType::F32, &[0; 4]);
    ResizeBilinear::new(10, 14, true)
        .execute(&input, None, &mut static_out)
        .unwrap();

    let dims = Tensor::from_slice(&[10_i32, 14], &[2]).unwrap();
    let mut dynamic_out = Tensor::zeroed(DataType::F32, &[0; 4]);
    ResizeBilinear::dynamic(true)
        .execute(&input, Some(&dims), &mut dynamic_out)
        .unwrap();

    assert_eq!(static_out, dynamic_out);
}

#[test]
fn downscale_keeps_half_plane_values() {
    // a half black, half white u8 plane downscaled to one pixel per
    // half keeps each half's value
    #[rustfmt::skip]
    let data = [
        0_u8, 0,   255, 255,
        0,    0,   255, 255,
        0,    0,   255, 255,
        0,    0,   255, 255
    ];
    let input = Tensor::from_slice(&data, &[1, 1, 4, 4]).unwrap();
    let mut output = Tensor::zeroed(DataType::U8, &[0; 4]);

    ResizeBilinear::new(2, 2, false)
        .execute(&input, None, &mut output)
        .unwrap();

    assert_eq!(output.data::<u8>().unwrap(), [0, 255, 0, 255]);
}

#[test]
fn repeated_execution_is_deterministic() {
    use nanorand::Rng;

    let mut rng = nanorand::WyRand::new();
    let mut data = vec![0.0_f32; 3 * 2 * 9 * 9];
    rng.fill(&mut data);

    let input = Tensor::from_slice(&data, &[3, 2, 9, 9]).unwrap();
    let resize = ResizeBilinear::new(17, 5, false);

    let mut first = Tensor::zeroed(DataType::F32, &[0; 4]);
    resize.execute(&input, None, &mut first).unwrap();

    for _ in 0..4 {
        let mut again = Tensor::zeroed(DataType::F32, &[0; 4]);
        resize.execute(&input, None, &mut again).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn malformed_dims_tensor_reports_and_preserves_output() {
    let input = position_coded_tensor(1, 1, 3, 3);
    let mut output = Tensor::from_elm(5_f32, &[1, 1, 2, 2]);

    // not rank 1
    let dims = Tensor::from_slice(&[2_i32, 2], &[2, 1]).unwrap();
    let result = ResizeBilinear::dynamic(false).execute(&input, Some(&dims), &mut output);

    assert!(matches!(result, Err(TensorErrors::InvalidDimsTensor(_))));
    assert_eq!(output.shape(), &[1, 1, 2, 2]);
    assert_eq!(output.data::<f32>().unwrap(), [5.0; 4]);
}
