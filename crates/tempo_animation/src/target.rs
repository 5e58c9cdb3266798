//! Animation targets and the host element contract

use crate::values::{AnimatableObject, AnimatableValue};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Opaque identity of a host element
///
/// The host decides what the raw value means (node index, slotmap key data,
/// pointer-derived id); the orchestration layer only passes it through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn from_raw(raw: u64) -> Self {
        ElementId(raw)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Child list returned by a host element
pub type Children = SmallVec<[ElementId; 8]>;

/// The element a motion binding is attached to
///
/// Read-only from the binding's point of view: children are queried fresh at
/// every dispatch and never mutated.
pub trait HostElement {
    /// The element itself
    fn element(&self) -> ElementId;

    /// Its current child elements, in document order
    fn children(&self) -> Children;
}

/// Shared handle to an animatable plain object
pub type ObjectRef = Rc<RefCell<dyn AnimatableObject>>;

/// What an animation drives
#[derive(Clone)]
pub enum AnimationTarget {
    /// One element
    Element(ElementId),
    /// An ordered collection of elements, typically staggered
    Elements(Vec<ElementId>),
    /// A plain object animated in place
    Object(ObjectRef),
    /// A bare value; progress is reported through the playback handle
    Value(AnimatableValue),
}

impl AnimationTarget {
    /// Number of individually animated targets
    pub fn len(&self) -> usize {
        match self {
            AnimationTarget::Elements(elements) => elements.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements this target addresses, empty for objects and values
    pub fn elements(&self) -> &[ElementId] {
        match self {
            AnimationTarget::Element(element) => std::slice::from_ref(element),
            AnimationTarget::Elements(elements) => elements,
            _ => &[],
        }
    }
}

impl PartialEq for AnimationTarget {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AnimationTarget::Element(a), AnimationTarget::Element(b)) => a == b,
            (AnimationTarget::Elements(a), AnimationTarget::Elements(b)) => a == b,
            (AnimationTarget::Object(a), AnimationTarget::Object(b)) => Rc::ptr_eq(a, b),
            (AnimationTarget::Value(a), AnimationTarget::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for AnimationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationTarget::Element(element) => f.debug_tuple("Element").field(element).finish(),
            AnimationTarget::Elements(elements) => {
                f.debug_tuple("Elements").field(elements).finish()
            }
            AnimationTarget::Object(_) => f.write_str("Object(..)"),
            AnimationTarget::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

impl From<ElementId> for AnimationTarget {
    fn from(element: ElementId) -> Self {
        AnimationTarget::Element(element)
    }
}

impl From<Vec<ElementId>> for AnimationTarget {
    fn from(elements: Vec<ElementId>) -> Self {
        AnimationTarget::Elements(elements)
    }
}
