//! Attribute names and attribute/value pairs
//!
//! - `TypedName<T>`: a statically typed attribute identifier
//! - `AttrName`: the type-erased form (name + value type)
//! - `Attribute`: an attribute name paired with a value; used for equality filters
//! - `AttributeSet`: an ordered set of attribute names (entity layouts)

use crate::error::{Error, Result};
use crate::value::{AttrValue, ValueType};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Rust types that can be stored in an attribute
pub trait AttrType: Clone + Send + Sync + 'static {
    /// The value type this Rust type maps to
    const VALUE_TYPE: ValueType;

    /// Extract from an attribute value (None on type mismatch)
    fn from_value(value: &AttrValue) -> Option<Self>;

    /// Wrap into an attribute value
    fn into_value(self) -> AttrValue;
}

impl AttrType for i64 {
    const VALUE_TYPE: ValueType = ValueType::Long;

    fn from_value(value: &AttrValue) -> Option<Self> {
        value.as_long()
    }

    fn into_value(self) -> AttrValue {
        AttrValue::Long(self)
    }
}

impl AttrType for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    fn from_value(value: &AttrValue) -> Option<Self> {
        value.as_double()
    }

    fn into_value(self) -> AttrValue {
        AttrValue::Double(self)
    }
}

impl AttrType for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn from_value(value: &AttrValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }

    fn into_value(self) -> AttrValue {
        AttrValue::Text(self)
    }
}

impl AttrType for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_value(value: &AttrValue) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> AttrValue {
        AttrValue::Bool(self)
    }
}

// ============================================================================
// TypedName
// ============================================================================

/// A typed attribute name
///
/// Pairs an attribute name with the Rust type of its values, so reads,
/// filters and sort keys declared through it are type-checked.
///
/// ```ignore
/// const USER_ID: TypedName<i64> = TypedName::new("user");
/// let uid: Option<i64> = entity.get(&USER_ID);
/// ```
pub struct TypedName<T> {
    name: Cow<'static, str>,
    _type: PhantomData<fn() -> T>,
}

impl<T: AttrType> TypedName<T> {
    /// Create a typed name from a static string (usable in constants)
    pub const fn new(name: &'static str) -> Self {
        TypedName {
            name: Cow::Borrowed(name),
            _type: PhantomData,
        }
    }

    /// Create a typed name from a runtime string
    pub fn of(name: impl Into<String>) -> Self {
        TypedName {
            name: Cow::Owned(name.into()),
            _type: PhantomData,
        }
    }

    /// The attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's value type
    pub fn value_type(&self) -> ValueType {
        T::VALUE_TYPE
    }

    /// Erase the static type
    pub fn erase(&self) -> AttrName {
        AttrName {
            name: self.name.clone(),
            value_type: T::VALUE_TYPE,
        }
    }

    /// Pair this name with a value
    pub fn attribute(&self, value: T) -> Attribute {
        Attribute {
            name: self.erase(),
            value: value.into_value(),
        }
    }
}

impl<T> Clone for TypedName<T> {
    fn clone(&self) -> Self {
        TypedName {
            name: self.name.clone(),
            _type: PhantomData,
        }
    }
}

impl<T> PartialEq for TypedName<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for TypedName<T> {}

impl<T> Hash for TypedName<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T: AttrType> fmt::Debug for TypedName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedName[{}: {}]", self.name, T::VALUE_TYPE)
    }
}

impl<T: AttrType> From<&TypedName<T>> for AttrName {
    fn from(name: &TypedName<T>) -> Self {
        name.erase()
    }
}

// ============================================================================
// AttrName
// ============================================================================

/// A type-erased attribute name: (name, value type)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrName {
    name: Cow<'static, str>,
    value_type: ValueType,
}

impl AttrName {
    /// Create an attribute name
    pub fn new(name: impl Into<Cow<'static, str>>, value_type: ValueType) -> Self {
        AttrName {
            name: name.into(),
            value_type,
        }
    }

    /// The attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's value type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Check that a value has this attribute's type
    pub fn check(&self, value: &AttrValue) -> Result<()> {
        if value.value_type() == self.value_type {
            Ok(())
        } else {
            Err(Error::AttributeType {
                name: self.name.to_string(),
                expected: self.value_type,
                actual: value.value_type(),
            })
        }
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value_type)
    }
}

// ============================================================================
// Attribute
// ============================================================================

/// An attribute name paired with a value
///
/// Used as an equality condition in queries: an entity satisfies the
/// attribute if it carries the attribute with an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    name: AttrName,
    value: AttrValue,
}

impl Attribute {
    /// Create an attribute, checking the value against the declared type
    pub fn new(name: AttrName, value: AttrValue) -> Result<Self> {
        name.check(&value)?;
        Ok(Attribute { name, value })
    }

    /// Create an attribute whose type is taken from the value
    pub fn untyped(name: impl Into<Cow<'static, str>>, value: AttrValue) -> Self {
        Attribute {
            name: AttrName::new(name, value.value_type()),
            value,
        }
    }

    /// The attribute name
    pub fn name(&self) -> &AttrName {
        &self.name
    }

    /// The attribute value
    pub fn value(&self) -> &AttrValue {
        &self.value
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name.name(), self.value)
    }
}

// ============================================================================
// AttributeSet
// ============================================================================

/// An ordered set of attribute names, unique by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    names: Vec<AttrName>,
}

impl AttributeSet {
    /// Create an attribute set; later duplicates of a name are ignored
    pub fn new(names: impl IntoIterator<Item = AttrName>) -> Self {
        let mut set = AttributeSet::default();
        for name in names {
            if set.lookup(name.name()).is_none() {
                set.names.push(name);
            }
        }
        set
    }

    /// Position of an attribute name in the set
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.name() == name)
    }

    /// Look up an attribute by name
    pub fn lookup(&self, name: &str) -> Option<&AttrName> {
        self.names.iter().find(|n| n.name() == name)
    }

    /// Iterate the attribute names in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &AttrName> {
        self.names.iter()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Is the set empty?
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<AttrName> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = AttrName>>(iter: I) -> Self {
        AttributeSet::new(iter)
    }
}
