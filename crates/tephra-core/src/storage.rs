/*
 * Copyright (c) 2024.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Type-erased backing storage for a tensor
//!
//! The storage is analogous to C/C++ `void *` but comes with some
//! safety measures imposed by its usage and the Rust interface in general
//!
//! A buffer is allocated for one element type, remembers that type's
//! [`TypeId`], and only hands out typed views after re-checking the tag,
//! the alignment and that the element size evenly divides the byte length.
//! This keeps the unsafe footprint to the allocation routines.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::any::TypeId;
use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use bytemuck::Pod;

use crate::datatype::{DataType, TensorType};

/// Minimum alignment for all tensor allocations
///
/// Keeping every buffer aligned this high means any of the supported
/// element types can reinterpret the bytes without tripping alignment
/// rules, even on platforms where unaligned reads are UB.
/// 64 covers the widest vector registers in common use (AVX-512).
pub const MIN_ALIGNMENT: usize = 64;

/// Errors that can occur when reinterpreting a storage buffer
#[derive(Copy, Clone)]
pub enum StorageErrors {
    /// Pointer alignment does not satisfy the requested type.
    /// Rare, since allocations are aligned to [`MIN_ALIGNMENT`], but checked anyway
    UnalignedPointer(usize, usize),
    /// The size of the requested type does not evenly divide
    /// the byte length of the buffer
    UnevenLength(usize, usize),
    /// The buffer was created for a different element type
    /// than the one it is being viewed as
    DifferentType(TypeId, TypeId)
}

impl Debug for StorageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageErrors::UnalignedPointer(found, expected) => {
                writeln!(f, "storage pointer {found} is not aligned to {expected}")
            }
            StorageErrors::UnevenLength(length, size_of_1) => {
                writeln!(
                    f,
                    "element size {size_of_1} cannot evenly divide byte length {length}"
                )
            }
            StorageErrors::DifferentType(expected, found) => {
                writeln!(f,"different type id {found:?} from expected {expected:?}, this indicates the storage is being viewed as a type it wasn't created with")
            }
        }
    }
}

/// A type-erased tensor buffer
///
/// Semantically a `Vec<T>` whose `T` has been erased, the bytes can be
/// viewed as the creating type by calling the `reinterpret` methods,
/// both as reference and as mutable.
///
/// Freshly allocated storage is always zero filled.
pub struct Storage {
    ptr:     *mut u8,
    length:  usize,
    // type id for which the storage was created with
    type_id: TypeId
}

// safety: The compiler cannot see that we own the allocation behind
// self.ptr since it is a raw pointer, but we never share it outside
// this struct, so handing the struct across threads is fine
unsafe impl Send for Storage {}

unsafe impl Sync for Storage {}

impl Storage {
    /// Allocate `size` zeroed bytes aligned to [`MIN_ALIGNMENT`]
    ///
    /// It is not unsafe to call this, it's just left as unsafe
    /// to remind one to be careful of what they are doing
    unsafe fn alloc(size: usize) -> *mut u8 {
        // the raw allocator does not accept zero sized layouts
        let layout = Layout::from_size_align(size.max(1), MIN_ALIGNMENT).unwrap();
        alloc_zeroed(layout)
    }

    /// Deallocate storage allocated for this buffer
    unsafe fn dealloc(&mut self) {
        let layout = Layout::from_size_align(self.length.max(1), MIN_ALIGNMENT).unwrap();
        // safety
        // - the layout matches the one used for the allocation,
        //   length never changes after construction
        dealloc(self.ptr, layout);
    }

    /// Create a zero-filled buffer able to hold `count` elements of type `T`
    ///
    /// # Example
    /// ```
    /// use tephra_core::storage::Storage;
    /// let storage = Storage::zeroed::<u16>(8);
    /// assert_eq!(storage.len(), 16);
    /// ```
    #[must_use]
    pub fn zeroed<T: TensorType>(count: usize) -> Storage {
        Self::zeroed_for_type(T::data_type(), count)
    }

    /// Create a zero-filled buffer able to hold `count` elements
    /// of the dynamic element type `dtype`
    #[must_use]
    pub fn zeroed_for_type(dtype: DataType, count: usize) -> Storage {
        let length = count * dtype.size_of();
        // safety: size and alignment are valid, and the buffer is
        // zeroed which is a valid bit pattern for all supported types
        let ptr = unsafe { Self::alloc(length) };

        Storage {
            ptr,
            length,
            type_id: dtype.type_id()
        }
    }

    /// Return the length of the underlying allocation in bytes,
    /// not respecting the stored type
    ///
    /// Meaning if the buffer stores 10 `u32`'s, the length is 40
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Return true if this buffer has a byte length of zero
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Return the type id the buffer was created with
    ///
    /// This allows some sort of dynamic type checking
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Confirm that the buffer is aligned for `T`, that `T` evenly
    /// divides its length and that `T` is the type it was created with
    fn confirm_suspicions<T: 'static>(&self) -> Result<(), StorageErrors> {
        if (self.ptr as usize) & (size_of::<T>() - 1) != 0 {
            return Err(StorageErrors::UnalignedPointer(
                self.ptr as usize,
                size_of::<T>()
            ));
        }

        if self.length % size_of::<T>() != 0 {
            return Err(StorageErrors::UnevenLength(self.length, size_of::<T>()));
        }

        let requested_type_id = TypeId::of::<T>();

        if requested_type_id != self.type_id {
            return Err(StorageErrors::DifferentType(
                self.type_id,
                requested_type_id
            ));
        }

        Ok(())
    }

    /// Reinterpret the buffer as a slice of the type
    /// it was created with
    pub fn reinterpret_as<T: Pod + 'static>(&self) -> Result<&[T], StorageErrors> {
        // check tag, alignment, and that T evenly divides the length
        self.confirm_suspicions::<T>()?;

        // safety:
        //  validity: we own the allocation for self.length bytes
        //  alignment: u8 is the least denomination of alignment
        let bytes = unsafe { std::slice::from_raw_parts(self.ptr, self.length) };

        let (prefix, slice, suffix) = bytemuck::pod_align_to(bytes);

        assert!(prefix.is_empty(), "extra sloppy bytes");
        assert!(suffix.is_empty(), "extra sloppy bytes");

        Ok(slice)
    }

    /// Reinterpret the buffer as a mutable slice of the type
    /// it was created with
    pub fn reinterpret_as_mut<T: Pod + 'static>(&mut self) -> Result<&mut [T], StorageErrors> {
        self.confirm_suspicions::<T>()?;

        // safety:
        //  validity: we own the allocation for self.length bytes
        //  alignment: u8 is the least denomination of alignment
        let bytes = unsafe { std::slice::from_raw_parts_mut(self.ptr, self.length) };

        let (prefix, slice, suffix) = bytemuck::pod_align_to_mut(bytes);

        assert!(prefix.is_empty(), "extra sloppy bytes");
        assert!(suffix.is_empty(), "extra sloppy bytes");

        Ok(slice)
    }
}

impl Clone for Storage {
    fn clone(&self) -> Self {
        let mut new_storage = Storage {
            // safety: same length as ours, overwritten below
            ptr:     unsafe { Self::alloc(self.length) },
            length:  self.length,
            type_id: self.type_id
        };

        // safety:
        // - both allocations span self.length bytes
        // - the regions cannot overlap, the new one was just allocated
        unsafe {
            new_storage.ptr.copy_from_nonoverlapping(self.ptr, self.length);
        }
        new_storage
    }
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length || self.type_id != other.type_id {
            return false;
        }
        // safety: u8 can alias anything and both lengths were confirmed equal
        unsafe {
            let us = std::slice::from_raw_parts(self.ptr, self.length);
            let them = std::slice::from_raw_parts(other.ptr, other.length);

            us == them
        }
    }
}

impl Eq for Storage {}

impl Debug for Storage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // safety: all types can alias u8, length spans the allocation
        let slice = unsafe { std::slice::from_raw_parts(self.ptr, self.length) };
        writeln!(f, "raw_bytes: {slice:?}")
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        // dealloc storage
        unsafe {
            self.dealloc();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Storage;

    /// check that we can't view the buffer as a type we didn't make it with
    #[test]
    fn test_wrong_interpretation() {
        let storage = Storage::zeroed::<u8>(16);
        assert!(storage.reinterpret_as::<u16>().is_err());
    }

    // test that we return for interpretations that match
    #[test]
    fn test_correct_interpretation() {
        let mut storage = Storage::zeroed::<u16>(4);
        storage.reinterpret_as_mut::<u16>().unwrap()[0] = 70;

        assert_eq!(storage.reinterpret_as::<u16>().unwrap(), [70, 0, 0, 0]);
    }

    #[test]
    fn test_fresh_storage_is_zeroed() {
        let storage = Storage::zeroed::<f32>(100);
        assert_eq!(storage.reinterpret_as::<f32>().unwrap(), [0.0; 100]);
    }

    #[test]
    fn test_clone_works() {
        let mut storage = Storage::zeroed::<u8>(10);
        storage.reinterpret_as_mut::<u8>().unwrap().fill(10);
        // clone has some special things
        let storage2 = storage.clone();

        assert_eq!(storage, storage2);
    }

    #[test]
    fn test_zero_sized_storage() {
        let storage = Storage::zeroed::<u8>(0);
        assert!(storage.is_empty());
        assert!(storage.reinterpret_as::<u8>().unwrap().is_empty());
    }
}
