//! Structural identity for elements.
//!
//! Elements are plain values with no identity of their own. Identity is
//! reconstructed every pass from (element type, explicit key, ordinal among
//! siblings sharing that type and key), so a node rebuilt with the same shape
//! maps onto the same cache, state and backing view as before.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// The runtime type of an element.
#[derive(Clone, Copy)]
pub struct ElementType {
    id: TypeId,
    name: &'static str,
}

impl ElementType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ElementType {}

impl Hash for ElementType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// An explicit key distinguishing siblings of the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(Rc<str>),
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(value as i64)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(Rc::from(value))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(Rc::from(value))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Stable identity of a child within its parent.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ElementIdentifier {
    element_type: ElementType,
    key: Option<Key>,
    count: usize,
}

impl ElementIdentifier {
    pub fn new(element_type: ElementType, key: Option<Key>, count: usize) -> Self {
        Self { element_type, key, count }
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Ordinal among siblings with the same type and key.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl fmt::Debug for ElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}.{}.{}", self.element_type.short_name(), key, self.count),
            None => write!(f, "{}.{}", self.element_type.short_name(), self.count),
        }
    }
}

/// Assigns identifiers to one sibling list, in encounter order.
///
/// The first child with a given (type, key) gets count 0, the next 1, and so on.
#[derive(Debug, Default)]
pub struct IdentifierFactory {
    counts: HashMap<(ElementType, Option<Key>), usize>,
}

impl IdentifierFactory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::with_capacity(capacity),
        }
    }

    pub fn next_identifier(&mut self, element_type: ElementType, key: Option<Key>) -> ElementIdentifier {
        let slot = self.counts.entry((element_type, key.clone())).or_insert(0);
        let count = *slot;
        *slot += 1;
        ElementIdentifier::new(element_type, key, count)
    }
}

/// The chain of identifiers from a resolve root down to a node.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ElementPath(Vec<ElementIdentifier>);

impl ElementPath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn identifiers(&self) -> &[ElementIdentifier] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn prepending(&self, identifier: ElementIdentifier) -> Self {
        let mut identifiers = Vec::with_capacity(self.0.len() + 1);
        identifiers.push(identifier);
        identifiers.extend(self.0.iter().cloned());
        Self(identifiers)
    }

    pub fn appending(&self, identifier: ElementIdentifier) -> Self {
        let mut identifiers = self.0.clone();
        identifiers.push(identifier);
        Self(identifiers)
    }

    /// Concatenate `other` below `self`.
    pub fn joined(&self, other: &ElementPath) -> Self {
        let mut identifiers = self.0.clone();
        identifiers.extend(other.0.iter().cloned());
        Self(identifiers)
    }
}

impl fmt::Debug for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, identifier) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", identifier)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_factory_counts_per_type() {
        let mut factory = IdentifierFactory::default();
        let ids = [
            factory.next_identifier(ElementType::of::<A>(), None),
            factory.next_identifier(ElementType::of::<B>(), None),
            factory.next_identifier(ElementType::of::<A>(), None),
        ];
        assert_eq!(ids[0], ElementIdentifier::new(ElementType::of::<A>(), None, 0));
        assert_eq!(ids[1], ElementIdentifier::new(ElementType::of::<B>(), None, 0));
        assert_eq!(ids[2], ElementIdentifier::new(ElementType::of::<A>(), None, 1));
    }

    #[test]
    fn test_factory_counts_per_key() {
        let mut factory = IdentifierFactory::default();
        let a = ElementType::of::<A>();
        let first = factory.next_identifier(a, Some("x".into()));
        let other = factory.next_identifier(a, Some("y".into()));
        let second = factory.next_identifier(a, Some("x".into()));
        let unkeyed = factory.next_identifier(a, None);
        assert_eq!(first.count(), 0);
        assert_eq!(other.count(), 0);
        assert_eq!(second.count(), 1);
        assert_eq!(unkeyed.count(), 0);
        assert_ne!(first, other);
    }

    #[test]
    fn test_identifier_display() {
        let id = ElementIdentifier::new(ElementType::of::<A>(), Some(Key::Int(7)), 2);
        assert_eq!(id.to_string(), "A.7.2");
        let id = ElementIdentifier::new(ElementType::of::<B>(), None, 0);
        assert_eq!(id.to_string(), "B.0");
    }

    #[test]
    fn test_short_name_strips_generics_and_path() {
        assert_eq!(ElementType::of::<Vec<u8>>().short_name(), "Vec");
    }

    #[test]
    fn test_path_building() {
        let a = ElementIdentifier::new(ElementType::of::<A>(), None, 0);
        let b = ElementIdentifier::new(ElementType::of::<B>(), None, 1);
        let path = ElementPath::empty().appending(a.clone());
        let prefixed = ElementPath::empty().appending(b.clone()).prepending(a.clone());
        assert_eq!(path.joined(&ElementPath::empty().appending(b)), prefixed);
        assert_eq!(prefixed.to_string(), "/A.0/B.1");
        assert_eq!(prefixed.len(), 2);
    }
}
