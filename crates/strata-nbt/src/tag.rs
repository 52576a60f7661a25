//! The tag value model.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// A compound tag body: named child tags, kept in key order.
pub type Compound = BTreeMap<String, Tag>;

/// Runtime type of a [`Tag`], with its binary type id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    /// Returns the binary type id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a type by its binary id.
    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => Self::End,
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::Int,
            4 => Self::Long,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::ByteArray,
            8 => Self::String,
            9 => Self::List,
            10 => Self::Compound,
            11 => Self::IntArray,
            12 => Self::LongArray,
            _ => return None,
        })
    }
}

/// A single tag value.
///
/// Floating point payloads compare and hash by bit pattern, so `Tag` is a
/// lawful `Eq + Hash` type and can key maps.
#[derive(Clone, Debug)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    /// Returns the runtime type of this tag.
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    /// Element type of a list tag: the type of its first element, or
    /// [`TagType::End`] for an empty list. `None` for non-list tags.
    pub fn list_element_type(&self) -> Option<TagType> {
        match self {
            Tag::List(items) => Some(items.first().map_or(TagType::End, Tag::tag_type)),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Tag]> {
        match self {
            Tag::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(longs) => Some(longs),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Tag::ByteArray(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tag::Byte(a), Tag::Byte(b)) => a == b,
            (Tag::Short(a), Tag::Short(b)) => a == b,
            (Tag::Int(a), Tag::Int(b)) => a == b,
            (Tag::Long(a), Tag::Long(b)) => a == b,
            (Tag::Float(a), Tag::Float(b)) => a.to_bits() == b.to_bits(),
            (Tag::Double(a), Tag::Double(b)) => a.to_bits() == b.to_bits(),
            (Tag::ByteArray(a), Tag::ByteArray(b)) => a == b,
            (Tag::String(a), Tag::String(b)) => a == b,
            (Tag::List(a), Tag::List(b)) => a == b,
            (Tag::Compound(a), Tag::Compound(b)) => a == b,
            (Tag::IntArray(a), Tag::IntArray(b)) => a == b,
            (Tag::LongArray(a), Tag::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag_type().hash(state);
        match self {
            Tag::Byte(n) => n.hash(state),
            Tag::Short(n) => n.hash(state),
            Tag::Int(n) => n.hash(state),
            Tag::Long(n) => n.hash(state),
            Tag::Float(n) => n.to_bits().hash(state),
            Tag::Double(n) => n.to_bits().hash(state),
            Tag::ByteArray(v) => v.hash(state),
            Tag::String(s) => s.hash(state),
            Tag::List(items) => items.hash(state),
            Tag::Compound(map) => map.hash(state),
            Tag::IntArray(v) => v.hash(state),
            Tag::LongArray(v) => v.hash(state),
        }
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Tag::Compound(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(tag: &Tag) -> u64 {
        let mut hasher = DefaultHasher::new();
        tag.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_type_ids_roundtrip() {
        for id in 0..=12u8 {
            assert_eq!(TagType::from_id(id).map(TagType::id), Some(id));
        }
        assert_eq!(TagType::from_id(13), None);
        assert_eq!(Tag::LongArray(vec![]).tag_type().id(), 12);
    }

    #[test]
    fn test_nan_floats_are_equal_to_themselves() {
        let a = Tag::Double(f64::NAN);
        assert_eq!(a, a.clone());
        assert_eq!(hash_of(&a), hash_of(&a.clone()));
    }

    #[test]
    fn test_list_element_type() {
        assert_eq!(Tag::List(vec![]).list_element_type(), Some(TagType::End));
        assert_eq!(
            Tag::List(vec![Tag::Int(1)]).list_element_type(),
            Some(TagType::Int)
        );
        assert_eq!(Tag::Int(1).list_element_type(), None);
    }

    #[test]
    fn test_compound_equality_ignores_insertion_order() {
        let mut a = Compound::new();
        a.insert("facing".into(), "north".into());
        a.insert("lit".into(), "true".into());
        let mut b = Compound::new();
        b.insert("lit".into(), "true".into());
        b.insert("facing".into(), "north".into());
        assert_eq!(Tag::Compound(a.clone()), Tag::Compound(b.clone()));
        assert_eq!(hash_of(&Tag::Compound(a)), hash_of(&Tag::Compound(b)));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Tag::Byte(3).as_i8(), Some(3));
        assert_eq!(Tag::Int(3).as_i8(), None);
        assert_eq!(Tag::from("stone").as_str(), Some("stone"));
        assert_eq!(Tag::LongArray(vec![1, 2]).as_long_array(), Some(&[1i64, 2][..]));
        assert!(Tag::Compound(Compound::new()).as_compound().is_some());
    }
}
