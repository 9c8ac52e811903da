//! `Vector3` at its native memory layout.
//!
//! The game passes vectors as three 64-bit argument slots: each float sits in
//! the low half of its slot and the high half is unused. The struct mirrors that
//! byte-for-byte, so it can be copied to and from foreign memory unchanged.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Three floats, each followed by a 32-bit padding word (24 bytes total).
///
/// Equality compares `x`, `y` and `z` only; padding words never take part.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    #[serde(skip)]
    _padding_x: i32,
    pub y: f32,
    #[serde(skip)]
    _padding_y: i32,
    pub z: f32,
    #[serde(skip)]
    _padding_z: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Vector3 needs exactly {expected} bytes, got {actual}")]
    Size { expected: usize, actual: usize },
}

impl Vector3 {
    pub const SIZE: usize = 24;
    pub const SLOTS: usize = 3;

    /// `(field, byte offset, size)` for every field, padding included.
    pub const LAYOUT: [(&'static str, usize, usize); 6] = [
        ("x", std::mem::offset_of!(Vector3, x), 4),
        ("_padding_x", std::mem::offset_of!(Vector3, _padding_x), 4),
        ("y", std::mem::offset_of!(Vector3, y), 4),
        ("_padding_y", std::mem::offset_of!(Vector3, _padding_y), 4),
        ("z", std::mem::offset_of!(Vector3, z), 4),
        ("_padding_z", std::mem::offset_of!(Vector3, _padding_z), 4),
    ];

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            _padding_x: 0,
            y,
            _padding_y: 0,
            z,
            _padding_z: 0,
        }
    }

    pub fn xyz(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Raw bytes in native order, padding included.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        bytemuck::cast(*self)
    }

    /// Read a vector from exactly [`Vector3::SIZE`] bytes. Padding is kept as found.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LayoutError> {
        bytemuck::try_pod_read_unaligned(bytes).map_err(|_| LayoutError::Size {
            expected: Self::SIZE,
            actual: bytes.len(),
        })
    }

    /// The vector as three 64-bit argument slots (little-endian view).
    pub fn slots(&self) -> [u64; Self::SLOTS] {
        [slot(self.x), slot(self.y), slot(self.z)]
    }

    /// Inverse of [`Vector3::slots`]; the high half of each slot is dropped.
    pub fn from_slots(slots: [u64; Self::SLOTS]) -> Self {
        Self::new(unslot(slots[0]), unslot(slots[1]), unslot(slots[2]))
    }
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Self) -> bool {
        self.xyz() == other.xyz()
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

fn slot(value: f32) -> u64 {
    u64::from(value.to_bits())
}

fn unslot(slot: u64) -> f32 {
    f32::from_bits((slot & 0xFFFF_FFFF) as u32)
}
