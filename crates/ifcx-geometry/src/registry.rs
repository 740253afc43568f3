// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory mesh and material stores
//!
//! Both caches key entries by a content hash and count references, so the
//! same geometry or color used by many objects is stored once.

use crate::mesh::{content_hash, MeshPayload};
use ifcx_model::{MaterialId, MaterialRegistry, MeshId, MeshRegistry, Rgba};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};

/// Entry counts reported by a cache
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Distinct entries currently stored
    pub entries: usize,
    /// Sum of reference counts over all entries
    pub references: usize,
    /// Requests answered with an existing entry
    pub hits: usize,
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    hash: u64,
    references: usize,
}

/// Ref-counted, hash-keyed storage shared by both caches
#[derive(Debug)]
struct Store<T> {
    by_hash: FxHashMap<u64, u32>,
    slots: FxHashMap<u32, Slot<T>>,
    next_id: u32,
    hits: usize,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self {
            by_hash: FxHashMap::default(),
            slots: FxHashMap::default(),
            next_id: 1,
            hits: 0,
        }
    }
}

impl<T> Store<T> {
    fn acquire(&mut self, hash: u64, make: impl FnOnce() -> T) -> u32 {
        if let Some(&id) = self.by_hash.get(&hash) {
            if let Some(slot) = self.slots.get_mut(&id) {
                slot.references += 1;
                self.hits += 1;
                return id;
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_hash.insert(hash, id);
        self.slots.insert(
            id,
            Slot {
                value: make(),
                hash,
                references: 1,
            },
        );
        id
    }

    fn retain(&mut self, id: u32) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.references += 1;
                true
            }
            None => false,
        }
    }

    fn release(&mut self, id: u32) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else {
            return false;
        };
        slot.references = slot.references.saturating_sub(1);
        if slot.references == 0 {
            let hash = slot.hash;
            self.slots.remove(&id);
            self.by_hash.remove(&hash);
        }
        true
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(&id).map(|slot| &slot.value)
    }

    fn references(&self, id: u32) -> usize {
        self.slots.get(&id).map_or(0, |slot| slot.references)
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.slots.len(),
            references: self.slots.values().map(|slot| slot.references).sum(),
            hits: self.hits,
        }
    }
}

/// Mesh store deduplicating by geometry content
#[derive(Debug, Default)]
pub struct MeshCache {
    store: Store<MeshPayload>,
}

impl MeshCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored mesh
    pub fn get(&self, id: MeshId) -> Option<&MeshPayload> {
        self.store.get(id.0)
    }

    /// Current reference count of a mesh, zero when absent
    pub fn references(&self, id: MeshId) -> usize {
        self.store.references(id.0)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

impl MeshRegistry for MeshCache {
    fn create_or_reuse(&mut self, points: &[[f32; 3]], indices: &[u32]) -> Option<MeshId> {
        let payload = MeshPayload {
            points: points.to_vec(),
            indices: indices.to_vec(),
        };
        if let Err(err) = payload.validate() {
            log::warn!("Rejected mesh: {}", err);
            return None;
        }

        let hash = content_hash(points, indices);
        Some(MeshId(self.store.acquire(hash, || payload)))
    }

    fn retain(&mut self, id: MeshId) {
        if !self.store.retain(id.0) {
            log::warn!("Retain of unknown mesh {}", id);
        }
    }

    fn release(&mut self, id: MeshId) {
        if !self.store.release(id.0) {
            log::warn!("Release of unknown mesh {}", id);
        }
    }
}

/// Material parameters as stored by [`MaterialCache`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialEntry {
    pub color: Rgba,
    pub opaque: bool,
    pub offset: f32,
}

impl MaterialEntry {
    fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.opaque.hash(&mut hasher);
        for component in self.color.0 {
            component.to_bits().hash(&mut hasher);
        }
        self.offset.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}

/// Material store deduplicating by (opacity mode, color, offset)
#[derive(Debug, Default)]
pub struct MaterialCache {
    store: Store<MaterialEntry>,
}

impl MaterialCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored material
    pub fn get(&self, id: MaterialId) -> Option<&MaterialEntry> {
        self.store.get(id.0)
    }

    /// Current reference count of a material, zero when absent
    pub fn references(&self, id: MaterialId) -> usize {
        self.store.references(id.0)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

impl MaterialRegistry for MaterialCache {
    fn create_or_reuse(&mut self, color: Rgba, opaque: bool, offset: f32) -> Option<MaterialId> {
        if color.0.iter().any(|c| !c.is_finite()) || !offset.is_finite() {
            log::warn!("Rejected material with non-finite parameters: {:?}", color);
            return None;
        }

        let entry = MaterialEntry {
            color,
            opaque,
            offset,
        };
        let hash = entry.content_hash();
        Some(MaterialId(self.store.acquire(hash, || entry)))
    }

    fn retain(&mut self, id: MaterialId) {
        if !self.store.retain(id.0) {
            log::warn!("Retain of unknown material {}", id);
        }
    }

    fn release(&mut self, id: MaterialId) {
        if !self.store.release(id.0) {
            log::warn!("Release of unknown material {}", id);
        }
    }
}
