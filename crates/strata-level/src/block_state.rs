//! Block identities.

use std::fmt;

use strata_nbt::Compound;

/// Name of the state returned by [`BlockState::air`].
pub const AIR: &str = "air";

/// An immutable block identity: a namespaced name plus a property document.
///
/// States compare and hash over the name, the properties and the empty
/// marker. Properties are owned by the state and only ever handed out by
/// shared reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    name: String,
    properties: Compound,
    is_empty: bool,
}

impl BlockState {
    /// Creates a non-empty state with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_properties(name, Compound::new())
    }

    /// Creates a non-empty state with the given properties.
    pub fn with_properties(name: impl Into<String>, properties: Compound) -> Self {
        Self {
            name: name.into(),
            properties,
            is_empty: false,
        }
    }

    /// Creates a state marked as empty, i.e. a fallback that can be ignored
    /// when placing blocks.
    pub fn empty_marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Compound::new(),
            is_empty: true,
        }
    }

    /// The canonical empty state, `air`.
    pub fn air() -> Self {
        Self::empty_marker(AIR)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the property document.
    pub fn properties(&self) -> &Compound {
        &self.properties
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.has_properties() {
            f.write_str("[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                match value.as_str() {
                    Some(text) => write!(f, "{key}={text}")?,
                    None => write!(f, "{key}={value:?}")?,
                }
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;
    use strata_nbt::Tag;

    fn stairs(facing: &str) -> BlockState {
        let mut props = Compound::new();
        props.insert("facing".into(), Tag::from(facing));
        props.insert("half".into(), Tag::from("bottom"));
        BlockState::with_properties("minecraft:oak_stairs", props)
    }

    #[test]
    fn test_equality_covers_all_fields() {
        assert_eq!(stairs("east"), stairs("east"));
        assert_ne!(stairs("east"), stairs("west"));
        assert_ne!(BlockState::new(AIR), BlockState::air());
        assert_ne!(BlockState::new("a"), BlockState::new("b"));
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut set = FxHashSet::default();
        set.insert(stairs("east"));
        set.insert(stairs("east"));
        set.insert(stairs("north"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_air_is_empty() {
        let air = BlockState::air();
        assert!(air.is_empty());
        assert_eq!(air.name(), "air");
        assert!(!air.has_properties());
        assert!(!BlockState::new("minecraft:stone").is_empty());
    }

    #[test]
    fn test_properties_are_owned() {
        let mut props = Compound::new();
        props.insert("lit".into(), Tag::from("true"));
        let state = BlockState::with_properties("minecraft:furnace", props.clone());
        props.insert("facing".into(), Tag::from("south"));
        assert_eq!(state.properties().len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(BlockState::new("minecraft:stone").to_string(), "minecraft:stone");
        assert_eq!(
            stairs("east").to_string(),
            "minecraft:oak_stairs[facing=east,half=bottom]"
        );
    }
}
