//! Fundamental identifier and value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque entity identifier as seen outside the ECS world.
///
/// Built from the ECS entity bits, so ids are unique for the lifetime of
/// the world that issued them, including generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Identifier of an object living in the renderer's scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// 24-bit RGB color packed as 0xRRGGBB.
///
/// Kept as an integer so colors compare bit-for-bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    /// Build from 8-bit channels.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn r(&self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(&self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Drop anything above the low 24 bits.
    pub fn validated(self) -> Self {
        Self(self.0 & 0x00ff_ffff)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}
