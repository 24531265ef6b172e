//! Packed per-node flags stored inline in the thin node header.

use bitflags::bitflags;

bitflags! {
    /// Flags that fit in the 16-bit `flags` field of a [`crate::Node`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct NodeFlags: u16 {
        /// Static member (field or anonymous initializer in static scope).
        const STATIC = 1 << 0;
        /// Primary constructor of its class.
        const PRIMARY = 1 << 1;
        /// Declaration produced by a lowering pass, not present in source.
        const SYNTHESIZED = 1 << 2;
    }
}
