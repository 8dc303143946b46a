//! Measurement cache, shaped like the element tree.
//!
//! Each [`CacheTree`] node memoizes `SizeConstraint -> Size` for one element
//! slot and owns the caches of that element's child slots. Nodes are shared
//! through `Rc` because a layout algorithm may hold measurables for all of its
//! children at once and measure them in any order.
//!
//! Entries are stamped with the pass generation that produced them:
//! - keyless entries are only reused within their own generation, since the
//!   element value behind a slot may have changed between passes;
//! - contents carrying a [`MeasurementCachingKey`] go through an LRU shared by
//!   the whole tree and are reused across passes and across slots.

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::num::NonZeroUsize;
use std::rc::Rc;

use lru::LruCache;

use crate::identity::ElementType;
use crate::layout::SizeConstraint;
use crate::primitives::Size;

const DEFAULT_KEYED_CAPACITY: usize = 512;

/// Identifies measurement inputs that are equal across passes.
///
/// Two contents with the same key must measure identically under the same
/// constraint and environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementCachingKey {
    kind: TypeId,
    input: u64,
}

impl MeasurementCachingKey {
    /// Key scoped to the type `T` (usually the element type) and a hashed input.
    pub fn new<T: 'static, I: Hash + ?Sized>(input: &I) -> Self {
        let mut hasher = DefaultHasher::new();
        input.hash(&mut hasher);
        Self {
            kind: TypeId::of::<T>(),
            input: hasher.finish(),
        }
    }
}

/// Hit/miss counters for a cache tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, Copy)]
struct CachedSize {
    size: Size,
    generation: u64,
}

/// State shared by every node of one tree.
struct SharedCache {
    generation: Cell<u64>,
    keyed: RefCell<LruCache<(MeasurementCachingKey, SizeConstraint), CachedSize>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl SharedCache {
    fn record(&self, hit: bool) {
        if hit {
            self.hits.set(self.hits.get() + 1);
        } else {
            self.misses.set(self.misses.get() + 1);
        }
    }
}

/// One node of the measurement cache.
pub struct CacheTree {
    element_type: Option<ElementType>,
    shared: Rc<SharedCache>,
    entries: RefCell<HashMap<SizeConstraint, CachedSize>>,
    children: RefCell<Vec<Option<Rc<CacheTree>>>>,
    last_visited: Cell<u64>,
}

impl CacheTree {
    /// A fresh root with the default keyed-cache capacity.
    pub fn new() -> Rc<CacheTree> {
        Self::with_keyed_capacity(DEFAULT_KEYED_CAPACITY)
    }

    /// A fresh root whose keyed cache holds up to `capacity` entries.
    pub fn with_keyed_capacity(capacity: usize) -> Rc<CacheTree> {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let shared = Rc::new(SharedCache {
            generation: Cell::new(0),
            keyed: RefCell::new(LruCache::new(capacity)),
            hits: Cell::new(0),
            misses: Cell::new(0),
        });
        Rc::new(Self::node(None, shared))
    }

    fn node(element_type: Option<ElementType>, shared: Rc<SharedCache>) -> CacheTree {
        let generation = shared.generation.get();
        CacheTree {
            element_type,
            shared,
            entries: RefCell::new(HashMap::new()),
            children: RefCell::new(Vec::new()),
            last_visited: Cell::new(generation),
        }
    }

    /// Start a new pass. Keyless entries from earlier passes stop matching.
    pub fn begin_pass(&self) {
        self.shared.generation.set(self.shared.generation.get() + 1);
        self.touch();
    }

    pub fn generation(&self) -> u64 {
        self.shared.generation.get()
    }

    /// The element type this slot was created for (`None` at the root).
    pub fn element_type(&self) -> Option<ElementType> {
        self.element_type
    }

    fn touch(&self) {
        self.last_visited.set(self.shared.generation.get());
    }

    /// Return the memoized size for `constraint`, or compute and store it.
    ///
    /// No borrow is held while `compute` runs, so it may freely measure
    /// descendants of this node.
    pub fn get(
        &self,
        constraint: SizeConstraint,
        key: Option<&MeasurementCachingKey>,
        compute: impl FnOnce() -> Size,
    ) -> Size {
        self.touch();
        let generation = self.shared.generation.get();

        if let Some(key) = key {
            let cached = self.shared.keyed.borrow_mut().get(&(*key, constraint)).copied();
            if let Some(entry) = cached {
                self.shared.record(true);
                tracing::trace!(?constraint, ?key, "keyed cache hit");
                self.shared
                    .keyed
                    .borrow_mut()
                    .put((*key, constraint), CachedSize { generation, ..entry });
                return entry.size;
            }
            self.shared.record(false);
            let size = compute();
            self.shared
                .keyed
                .borrow_mut()
                .put((*key, constraint), CachedSize { size, generation });
            return size;
        }

        let cached = self
            .entries
            .borrow()
            .get(&constraint)
            .filter(|entry| entry.generation == generation)
            .map(|entry| entry.size);
        if let Some(size) = cached {
            self.shared.record(true);
            tracing::trace!(element = ?self.element_type, ?constraint, "cache hit");
            return size;
        }

        self.shared.record(false);
        tracing::trace!(element = ?self.element_type, ?constraint, "cache miss");
        let size = compute();
        self.entries
            .borrow_mut()
            .insert(constraint, CachedSize { size, generation });
        size
    }

    /// The cache for child slot `index` of `count` siblings.
    ///
    /// The slot is created on first use and replaced when the element type
    /// occupying it changes. Slots past `count` are dropped.
    pub fn subcache(&self, index: usize, count: usize, element_type: ElementType) -> Rc<CacheTree> {
        debug_assert!(index < count, "subcache index {} out of {} siblings", index, count);
        let mut children = self.children.borrow_mut();
        children.resize_with(count.max(index + 1), || None);

        if let Some(existing) = &children[index] {
            if existing.element_type == Some(element_type) {
                existing.touch();
                return Rc::clone(existing);
            }
            tracing::trace!(
                index,
                old = ?existing.element_type,
                new = ?element_type,
                "element type changed, replacing subcache"
            );
        }

        let child = Rc::new(Self::node(Some(element_type), Rc::clone(&self.shared)));
        children[index] = Some(Rc::clone(&child));
        child
    }

    /// A child cache that is not stored in this node.
    ///
    /// It still shares the tree's generation and keyed cache, but its
    /// keyless entries die with the returned handle.
    pub fn detached_subcache(&self, element_type: ElementType) -> Rc<CacheTree> {
        self.touch();
        Rc::new(Self::node(Some(element_type), Rc::clone(&self.shared)))
    }

    /// Drop subtrees and keyed entries not visited in the last `max_age` passes.
    ///
    /// Returns the number of cache nodes removed.
    pub fn gc(&self, max_age: u64) -> usize {
        let cutoff = self.shared.generation.get().saturating_sub(max_age);

        let stale: Vec<(MeasurementCachingKey, SizeConstraint)> = self
            .shared
            .keyed
            .borrow()
            .iter()
            .filter(|(_, entry)| entry.generation < cutoff)
            .map(|(key, _)| *key)
            .collect();
        let mut keyed = self.shared.keyed.borrow_mut();
        for key in stale {
            keyed.pop(&key);
        }
        drop(keyed);

        self.gc_nodes(cutoff)
    }

    fn gc_nodes(&self, cutoff: u64) -> usize {
        let mut removed = 0;
        self.entries.borrow_mut().retain(|_, entry| entry.generation >= cutoff);
        for slot in self.children.borrow_mut().iter_mut() {
            let expired = match slot {
                Some(child) if child.last_visited.get() < cutoff => true,
                Some(child) => {
                    removed += child.gc_nodes(cutoff);
                    false
                }
                None => false,
            };
            if expired {
                removed += slot.as_ref().map_or(0, |child| child.node_count());
                *slot = None;
            }
        }
        removed
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .borrow()
            .iter()
            .flatten()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Number of memoized constraints on this node.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Number of entries in the shared keyed cache.
    pub fn keyed_len(&self) -> usize {
        self.shared.keyed.borrow().len()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.shared.hits.get(),
            misses: self.shared.misses.get(),
        }
    }

    pub fn reset_stats(&self) {
        self.shared.hits.set(0);
        self.shared.misses.set(0);
    }
}

impl std::fmt::Debug for CacheTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheTree")
            .field("element_type", &self.element_type)
            .field("entries", &self.entries.borrow().len())
            .field("children", &self.children.borrow().len())
            .field("last_visited", &self.last_visited.get())
            .finish()
    }
}

// =========================================================================
// Tests
// =========================================================================
