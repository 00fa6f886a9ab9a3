//! Little-endian reading of the primitive types used by compiled scripts.
//!
//! Every multi-byte field in a script is stored little-endian: the 16-bit instruction header,
//! the integer and float operand payloads, and the offsets inside array-access descriptors.
//! This module provides the [`crate::file::io::ScmIO`] trait, implemented for those primitive
//! types, and two bounds-checked readers built on it.
//!
//! # Key Components
//!
//! - [`crate::file::io::ScmIO`] - Conversion from a fixed-size little-endian byte array
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset, advancing the offset
//!
//! # Examples
//!
//! ```rust,ignore
//! use scmscope::file::io::read_le_at;
//!
//! let data = [0x01, 0x00, 0xFE, 0xFF, 0xFF, 0xFF];
//! let mut offset = 0;
//!
//! let first: u16 = read_le_at(&data, &mut offset)?;  // offset: 0 -> 2
//! let second: i32 = read_le_at(&data, &mut offset)?; // offset: 2 -> 6
//!
//! assert_eq!(first, 1);
//! assert_eq!(second, -2);
//! # Ok::<(), scmscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! Both readers return [`crate::Error::TruncatedInput`] when the buffer holds fewer bytes than
//! the requested type, and leave the offset untouched in that case.

use crate::{Error, Result};

/// Trait for primitive types that can be read from a little-endian byte array.
///
/// Each implementation names the fixed-size byte array holding its encoding in `Bytes`
/// (e.g. `[u8; 4]` for `i32`).
pub trait ScmIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_scm_io {
    ($($ty:ty => $len:literal),* $(,)?) => {
        $(
            impl ScmIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_scm_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    f32 => 4,
}

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Errors
///
/// Returns [`crate::Error::TruncatedInput`] if the buffer is shorter than `T`.
pub fn read_le<T: ScmIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing
/// `offset` by the size of `T`.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (advanced only on success)
///
/// # Errors
///
/// Returns [`crate::Error::TruncatedInput`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_le_at<T: ScmIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let available = data.len().saturating_sub(*offset);
    let truncated = Error::TruncatedInput {
        offset: *offset,
        requested: type_len,
        available,
    };

    if type_len > available {
        return Err(truncated);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(truncated);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}
