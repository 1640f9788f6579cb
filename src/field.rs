//! Fields: per-dof data handles over a function space with shared storage.
//!
//! A [`Field`] couples an `Arc<FunctionSpace>` with a section of values
//! behind an `Arc<RwLock>`. Cloning a field *aliases* its storage: every
//! clone observes every mutation. This is the substrate for the coordinate
//! contract, where a mesh and the field it was constructed from share data.
//! Use [`Field::deep_copy`] when an independent copy is wanted.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::data::CpuSection;
use crate::error::MeshCoordsError;
use crate::space::FunctionSpace;
use crate::topology::point::PointId;

/// A function on a [`FunctionSpace`]: one value slice per supported point.
///
/// `Clone` is shallow: clones share the underlying value buffer.
#[derive(Clone, Debug)]
pub struct Field<V = f64> {
    space: Arc<FunctionSpace>,
    values: Arc<RwLock<CpuSection<V>>>,
    name: Option<String>,
}

impl<V: Clone + Default> Field<V> {
    /// Allocate a zero-initialized field on `space`.
    pub fn new(space: Arc<FunctionSpace>) -> Self {
        let section = CpuSection::new(space.atlas().clone());
        Self {
            space,
            values: Arc::new(RwLock::new(section)),
            name: None,
        }
    }

    /// Attach a diagnostic name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// An independent copy: same space, detached value buffer.
    pub fn deep_copy(&self) -> Self {
        let section = self.values.read().clone();
        Self {
            space: Arc::clone(&self.space),
            values: Arc::new(RwLock::new(section)),
            name: self.name.clone(),
        }
    }

    /// Run `f` with read access to the value section.
    pub fn with_values<R>(&self, f: impl FnOnce(&CpuSection<V>) -> R) -> R {
        f(&self.values.read())
    }

    /// Run `f` with write access to the value section (in-place mutation).
    pub fn with_values_mut<R>(&self, f: impl FnOnce(&mut CpuSection<V>) -> R) -> R {
        f(&mut self.values.write())
    }

    /// Clone out the value slice for point `p`.
    ///
    /// # Errors
    /// `MissingAtlasPoint` if `p` carries no dofs in this space.
    pub fn try_get_point(&self, p: PointId) -> Result<Vec<V>, MeshCoordsError> {
        self.with_values(|section| section.try_restrict(p).map(<[V]>::to_vec))
    }

    /// Overwrite the value slice for point `p`.
    ///
    /// The write is visible through every handle sharing this storage.
    ///
    /// # Errors
    /// `MissingAtlasPoint` if `p` carries no dofs; `SliceLengthMismatch` if
    /// `val` has the wrong length (no partial write occurs).
    pub fn try_set_point(&self, p: PointId, val: &[V]) -> Result<(), MeshCoordsError> {
        self.with_values_mut(|section| section.try_set(p, val))
    }

    /// Overwrite several points' value slices.
    ///
    /// Updates are applied in order; on error, earlier updates remain.
    pub fn try_update_points<I>(&self, updates: I) -> Result<(), MeshCoordsError>
    where
        I: IntoIterator<Item = (PointId, Vec<V>)>,
    {
        self.with_values_mut(|section| {
            for (p, val) in updates {
                section.try_set(p, val.as_slice())?;
            }
            Ok(())
        })
    }

    /// Apply `f` to every scalar value in place.
    pub fn map_values_mut(&self, mut f: impl FnMut(&mut V)) {
        self.with_values_mut(|section| {
            for v in section.values_mut() {
                f(v);
            }
        });
    }

    pub(crate) fn from_parts(
        space: Arc<FunctionSpace>,
        values: Arc<RwLock<CpuSection<V>>>,
        name: Option<String>,
    ) -> Self {
        Self {
            space,
            values,
            name,
        }
    }

    pub(crate) fn values_arc(&self) -> &Arc<RwLock<CpuSection<V>>> {
        &self.values
    }
}

impl<V> Field<V> {
    /// The space this field lives on.
    #[inline]
    pub fn space(&self) -> &Arc<FunctionSpace> {
        &self.space
    }

    /// Diagnostic name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether `self` and `other` alias the same value buffer.
    #[inline]
    pub fn shares_storage_with(&self, other: &Field<V>) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}
