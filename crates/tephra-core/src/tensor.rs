/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The tensor type kernels read from and write into
//!
//! A [`Tensor`] pairs a shape with type-erased backing storage.
//! Rank-4 tensors are laid out as `(batch, channel, height, width)`,
//! row major within the last two axes, each channel plane contiguous.
//!
//! The element type is dynamic (see
//! [`DataType`](crate::datatype::DataType)); kernels recover typed slices
//! through [`data`](Tensor::data) / [`data_mut`](Tensor::data_mut) and
//! dispatch on the tag.

use crate::datatype::{DataType, TensorType};
use crate::errors::TensorErrors;
use crate::storage::Storage;

/// A dynamically typed, shape-aware value container
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tensor {
    shape:   Vec<usize>,
    dtype:   DataType,
    storage: Storage
}

impl Tensor {
    /// Create a zero-filled tensor of the given element type and shape
    ///
    /// # Example
    /// ```
    /// use tephra_core::datatype::DataType;
    /// use tephra_core::tensor::Tensor;
    /// let tensor = Tensor::zeroed(DataType::F32, &[1, 3, 8, 8]);
    /// assert_eq!(tensor.num_elements(), 192);
    /// ```
    #[must_use]
    pub fn zeroed(dtype: DataType, shape: &[usize]) -> Tensor {
        let count = shape.iter().product();

        Tensor {
            shape: shape.to_vec(),
            dtype,
            storage: Storage::zeroed_for_type(dtype, count)
        }
    }

    /// Create a tensor from a flat slice of values laid out in the
    /// given shape
    ///
    /// # Errors
    /// Returns [`TensorErrors::DimensionMismatch`] if the shape does not
    /// describe exactly `data.len()` elements.
    ///
    /// # Example
    /// ```
    /// use tephra_core::tensor::Tensor;
    /// let tensor = Tensor::from_slice(&[1.0_f32, 2.0, 3.0, 4.0], &[1, 1, 2, 2]).unwrap();
    /// assert_eq!(tensor.dim(3), 2);
    /// ```
    pub fn from_slice<T: TensorType>(data: &[T], shape: &[usize]) -> Result<Tensor, TensorErrors> {
        let count = shape.iter().product::<usize>();

        if count != data.len() {
            return Err(TensorErrors::DimensionMismatch(count, data.len()));
        }
        let mut tensor = Tensor::zeroed(T::data_type(), shape);
        tensor.data_mut::<T>()?.copy_from_slice(data);

        Ok(tensor)
    }

    /// Create a tensor of the given shape with every element
    /// set to `elm`
    ///
    /// # Example
    /// ```
    /// use tephra_core::tensor::Tensor;
    /// let tensor = Tensor::from_elm(255_u8, &[1, 1, 4, 4]);
    /// assert_eq!(tensor.data::<u8>().unwrap(), &[255; 16]);
    /// ```
    #[must_use]
    pub fn from_elm<T: TensorType>(elm: T, shape: &[usize]) -> Tensor {
        let mut tensor = Tensor::zeroed(T::data_type(), shape);
        // the unwrap cannot fire, the storage was created for T above
        tensor.data_mut::<T>().unwrap().fill(elm);

        tensor
    }

    /// Return the number of axes of this tensor
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Return the extent of axis `axis`
    ///
    /// # Panics
    /// If `axis >= self.rank()`
    #[must_use]
    pub fn dim(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    /// Return the full shape of this tensor
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Return the element type tag of this tensor
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.dtype
    }

    /// Return the total number of elements this tensor holds
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.shape.iter().product()
    }

    /// Return a typed read-only view of the tensor's elements
    ///
    /// # Errors
    /// Returns a storage error if `T` is not the element type the
    /// tensor was created with.
    pub fn data<T: TensorType>(&self) -> Result<&[T], TensorErrors> {
        self.storage.reinterpret_as::<T>().map_err(Into::into)
    }

    /// Return a typed mutable view of the tensor's elements
    ///
    /// # Errors
    /// Returns a storage error if `T` is not the element type the
    /// tensor was created with.
    pub fn data_mut<T: TensorType>(&mut self) -> Result<&mut [T], TensorErrors> {
        self.storage.reinterpret_as_mut::<T>().map_err(Into::into)
    }

    /// Resize the backing storage to fit `shape`, discarding
    /// current contents
    ///
    /// The new buffer is zero filled. The element type is kept.
    pub fn resize(&mut self, shape: &[usize]) {
        let count = shape.iter().product();

        self.shape = shape.to_vec();
        self.storage = Storage::zeroed_for_type(self.dtype, count);
    }
}

#[cfg(test)]
mod tests {
    use crate::datatype::DataType;
    use crate::errors::TensorErrors;
    use crate::tensor::Tensor;

    #[test]
    fn test_zeroed_layout() {
        let tensor = Tensor::zeroed(DataType::U16, &[2, 3, 4, 5]);

        assert_eq!(tensor.rank(), 4);
        assert_eq!(tensor.shape(), &[2, 3, 4, 5]);
        assert_eq!(tensor.num_elements(), 120);
        assert_eq!(tensor.data::<u16>().unwrap(), &[0; 120]);
    }

    #[test]
    fn test_from_slice_rejects_wrong_shape() {
        let result = Tensor::from_slice(&[1.0_f32, 2.0, 3.0], &[1, 1, 2, 2]);

        assert!(matches!(
            result,
            Err(TensorErrors::DimensionMismatch(4, 3))
        ));
    }

    #[test]
    fn test_data_rejects_wrong_type() {
        let tensor = Tensor::zeroed(DataType::U8, &[1, 1, 2, 2]);
        assert!(tensor.data::<f32>().is_err());
    }

    #[test]
    fn test_resize_discards_and_zeroes() {
        let mut tensor = Tensor::from_elm(7_u8, &[1, 1, 2, 2]);
        tensor.resize(&[1, 1, 4, 4]);

        assert_eq!(tensor.shape(), &[1, 1, 4, 4]);
        assert_eq!(tensor.data::<u8>().unwrap(), &[0; 16]);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut tensor = Tensor::from_elm(1.5_f32, &[1, 2, 2, 2]);
        let copy = tensor.clone();

        tensor.data_mut::<f32>().unwrap().fill(9.0);
        assert_eq!(copy.data::<f32>().unwrap(), &[1.5; 8]);
    }
}
