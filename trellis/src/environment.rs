//! Ambient configuration threaded explicitly through every pass.
//!
//! An [`Environment`] is an immutable-by-default bag of typed values. Reads
//! of a key that was never set return the key's default. Writes clone the
//! backing map only when it is shared, so passing environments down the tree
//! is a reference-count bump.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A typed key into an [`Environment`].
///
/// ```ignore
/// struct AccentSpacing;
///
/// impl EnvironmentKey for AccentSpacing {
///     type Value = f32;
///     fn default_value() -> f32 { 8.0 }
/// }
///
/// let env = Environment::default().with::<AccentSpacing>(12.0);
/// assert_eq!(env.get::<AccentSpacing>(), 12.0);
/// ```
pub trait EnvironmentKey: 'static {
    type Value: Clone + 'static;

    /// Value returned when the key has not been set.
    fn default_value() -> Self::Value;
}

#[derive(Clone)]
struct Entry {
    key_name: &'static str,
    value: Rc<dyn Any>,
}

/// Copy-on-write map of environment values.
#[derive(Clone, Default)]
pub struct Environment {
    values: Rc<HashMap<TypeId, Entry>>,
}

impl Environment {
    /// An environment where every key reads its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value, falling back to the key's default.
    pub fn get<K: EnvironmentKey>(&self) -> K::Value {
        self.values
            .get(&TypeId::of::<K>())
            .and_then(|entry| entry.value.downcast_ref::<K::Value>())
            .cloned()
            .unwrap_or_else(K::default_value)
    }

    /// Whether the key was explicitly set.
    pub fn contains<K: EnvironmentKey>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<K>())
    }

    /// Set a value in place. Clones the backing map if it is shared.
    pub fn set<K: EnvironmentKey>(&mut self, value: K::Value) {
        Rc::make_mut(&mut self.values).insert(
            TypeId::of::<K>(),
            Entry {
                key_name: std::any::type_name::<K>(),
                value: Rc::new(value),
            },
        );
    }

    /// Builder-style [`set`](Self::set).
    pub fn with<K: EnvironmentKey>(mut self, value: K::Value) -> Self {
        self.set::<K>(value);
        self
    }

    /// Number of explicitly set keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether two environments share the same backing storage.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.values, &other.values)
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.get::<LayoutDirectionKey>()
    }

    pub fn display_scale(&self) -> f32 {
        self.get::<DisplayScaleKey>()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.values().map(|entry| entry.key_name).collect();
        names.sort_unstable();
        f.debug_struct("Environment").field("keys", &names).finish()
    }
}

/// Horizontal flow of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Key for the ambient [`LayoutDirection`].
pub struct LayoutDirectionKey;

impl EnvironmentKey for LayoutDirectionKey {
    type Value = LayoutDirection;

    fn default_value() -> LayoutDirection {
        LayoutDirection::LeftToRight
    }
}

/// Key for the device pixels-per-point ratio.
pub struct DisplayScaleKey;

impl EnvironmentKey for DisplayScaleKey {
    type Value = f32;

    fn default_value() -> f32 {
        1.0
    }
}
