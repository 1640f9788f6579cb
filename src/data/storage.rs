//! Pluggable storage for Section buffers.
//!
//! Abstracts how a Section's flat buffer is stored. The default is a plain
//! `Vec`; the trait keeps slice semantics so alternative backends can be
//! added without touching Section's public API.

use core::fmt::{self, Debug};

use crate::error::MeshCoordsError;

/// Contiguous, indexable storage for `V` with slice access.
pub trait Storage<V>: Debug {
    /// Construct a buffer of `len` elements, filled with `fill`.
    fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone;

    /// Current length in elements.
    fn len(&self) -> usize;

    /// Whether the buffer is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entire read-only buffer.
    fn as_slice(&self) -> &[V];

    /// Entire mutable buffer.
    fn as_mut_slice(&mut self) -> &mut [V];

    /// Copy `src` into the range `[offset .. offset + src.len())`.
    fn write_at(&mut self, offset: usize, src: &[V]) -> Result<(), MeshCoordsError>
    where
        V: Clone,
    {
        let end = offset
            .checked_add(src.len())
            .ok_or(MeshCoordsError::StorageChunkMismatch {
                offset,
                len: src.len(),
            })?;
        let buf = self.as_mut_slice();
        let dst = buf
            .get_mut(offset..end)
            .ok_or(MeshCoordsError::StorageChunkMismatch {
                offset,
                len: src.len(),
            })?;
        dst.clone_from_slice(src);
        Ok(())
    }

    /// Read the range `[offset .. offset + len)` into `dst`.
    fn read_into(&self, offset: usize, len: usize, dst: &mut [V]) -> Result<(), MeshCoordsError>
    where
        V: Clone,
    {
        if dst.len() != len {
            return Err(MeshCoordsError::StorageLengthMismatch {
                expected: len,
                found: dst.len(),
            });
        }
        let end = offset
            .checked_add(len)
            .ok_or(MeshCoordsError::StorageChunkMismatch { offset, len })?;
        let buf = self.as_slice();
        let src = buf
            .get(offset..end)
            .ok_or(MeshCoordsError::StorageChunkMismatch { offset, len })?;
        dst.clone_from_slice(src);
        Ok(())
    }
}

/// `Vec`-backed storage (default).
#[derive(Clone)]
pub struct VecStorage<V>(pub(crate) Vec<V>);

impl<V> Debug for VecStorage<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecStorage")
            .field("len", &self.0.len())
            .finish()
    }
}

impl<V> Storage<V> for VecStorage<V> {
    fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone,
    {
        Self(vec![fill; len])
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn as_slice(&self) -> &[V] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [V] {
        &mut self.0
    }
}

impl<V> From<Vec<V>> for VecStorage<V> {
    fn from(v: Vec<V>) -> Self {
        Self(v)
    }
}

impl<V> VecStorage<V> {
    /// Consume the wrapper, returning the inner vector.
    pub fn into_inner(self) -> Vec<V> {
        self.0
    }
}
