//! Key elements and identity-compared object handles.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Stable identity of a live object allocation.
///
/// Two [`Object`] handles have the same id exactly when they share one
/// allocation. The id stays unique for as long as any handle to the
/// allocation exists, weak handles included.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({:#x})", self.0)
    }
}

/// Reference-counted, type-erased object used as an identity key.
///
/// Cloning an `Object` yields another handle to the same identity. Equality
/// and hashing never look at the contents.
#[derive(Clone)]
pub struct Object(Rc<dyn Any>);

impl Object {
    /// Allocates a new object holding `value`.
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Wraps an existing shared allocation without copying it.
    #[must_use]
    pub fn from_rc(rc: Rc<dyn Any>) -> Self {
        Self(rc)
    }

    /// Returns the identity of this object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(&self.0).cast::<()>().addr())
    }

    /// Returns true if both handles refer to the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Attempts to borrow the contents as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>()
    }

    /// Creates a non-owning handle to this object.
    #[must_use]
    pub fn downgrade(&self) -> WeakObject {
        WeakObject(Rc::downgrade(&self.0))
    }

    /// Number of owning handles currently alive.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({:#x})", self.id().0)
    }
}

/// Non-owning handle to an [`Object`].
///
/// Holding a `WeakObject` does not keep the object alive, but it does keep
/// the allocation reserved, so its [`ObjectId`] cannot be reused by a
/// different object in the meantime.
#[derive(Clone)]
pub struct WeakObject(Weak<dyn Any>);

impl WeakObject {
    /// Returns the identity of the referenced object.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        ObjectId(self.0.as_ptr().cast::<()>().addr())
    }

    /// Returns true while at least one owning handle exists.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Attempts to recover an owning handle.
    #[must_use]
    pub fn upgrade(&self) -> Option<Object> {
        self.0.upgrade().map(Object)
    }
}

impl fmt::Debug for WeakObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_alive() { "alive" } else { "dead" };
        write!(f, "WeakObject({:#x}, {state})", self.id().0)
    }
}

/// Coarse classification of a [`Key`], used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// The nil key.
    Nil,
    /// Boolean key.
    Bool,
    /// Integer key.
    Int,
    /// Floating point key.
    Float,
    /// String key.
    String,
    /// Object reference key.
    Object,
}

impl KeyType {
    /// Returns true for every type except [`KeyType::Object`].
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Object)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// One element of a composite key tuple.
///
/// Primitive variants compare by value; [`Key::Object`] compares by
/// identity. Variants never compare equal to each other, so `Int(1)`,
/// `Float(1.0)` and `Str("1")` are three distinct keys.
///
/// Floats use same-value-zero equality: `NaN` equals `NaN`, and `0.0`
/// equals `-0.0`.
#[derive(Clone)]
pub enum Key {
    /// The nil key.
    Nil,
    /// Boolean key.
    Bool(bool),
    /// 64-bit signed integer key.
    Int(i64),
    /// 64-bit floating point key.
    Float(f64),
    /// String key, compared by contents.
    Str(Arc<str>),
    /// Object key, compared by identity.
    Object(Object),
}

impl Key {
    /// Returns the type of this key.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Nil => KeyType::Nil,
            Self::Bool(_) => KeyType::Bool,
            Self::Int(_) => KeyType::Int,
            Self::Float(_) => KeyType::Float,
            Self::Str(_) => KeyType::String,
            Self::Object(_) => KeyType::Object,
        }
    }

    /// Returns true if this key is an object reference.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Attempts to extract the object reference.
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Bit pattern that is equal exactly when two floats are same-value-zero equal.
    fn float_bits(n: f64) -> u64 {
        if n.is_nan() {
            f64::NAN.to_bits()
        } else if n == 0.0 {
            0
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => Self::float_bits(*n).hash(state),
            Self::Str(s) => s.hash(state),
            Self::Object(obj) => obj.hash(state),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Object(obj) => write!(f, "{obj:?}"),
        }
    }
}

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<Object> for Key {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

impl From<&Object> for Key {
    fn from(obj: &Object) -> Self {
        Self::Object(obj.clone())
    }
}
