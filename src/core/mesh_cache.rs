use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::geometry::Geometry;
use crate::scene::{Disposable, SharedGeometry};

struct Entry<T> {
    geometry: Weak<RefCell<Geometry>>,
    value: T,
}

/// GPU-side values keyed by the shared geometry they mirror
///
/// Meshes sharing one geometry share one entry. Each entry holds a weak
/// handle, which keeps the allocation and therefore the key from being
/// reused until the entry is pruned.
pub struct MeshCache<T> {
    entries: HashMap<usize, Entry<T>>,
}

impl<T> Default for MeshCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Disposable> MeshCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(geometry: &SharedGeometry) -> usize {
        Rc::as_ptr(geometry) as usize
    }

    pub fn get_or_insert_with(&mut self, geometry: &SharedGeometry, create: impl FnOnce() -> T) -> &mut T {
        &mut self
            .entries
            .entry(Self::key(geometry))
            .or_insert_with(|| Entry {
                geometry: Rc::downgrade(geometry),
                value: create(),
            })
            .value
    }

    pub fn get(&self, geometry: &SharedGeometry) -> Option<&T> {
        self.entries.get(&Self::key(geometry)).map(|entry| &entry.value)
    }

    /// Dispose and drop entries whose geometry is gone or disposed
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            let live = entry
                .geometry
                .upgrade()
                .is_some_and(|geometry| geometry.try_borrow().map_or(true, |g| !g.is_disposed()));
            if !live {
                entry.value.dispose();
            }
            live
        });
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Disposable> Disposable for MeshCache<T> {
    fn dispose(&mut self) {
        for (_, mut entry) in self.entries.drain() {
            entry.value.dispose();
        }
    }
}
