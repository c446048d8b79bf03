//! Block payloads: the state identifier that keys every group, plus the
//! optional metadata tag and placement rule that ride along with it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Namespace assumed when a block id is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

// ---------------------------------------------------------------------------
// BlockState
// ---------------------------------------------------------------------------

/// A block id plus its property assignments, e.g. `minecraft:oak_log[axis=y]`.
///
/// Properties are kept sorted by key so that two states built in a different
/// order compare and hash equal. This is the grouping key of every index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockState {
    block: String,
    properties: Vec<(String, String)>,
}

/// Errors from parsing a textual block state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateParseError {
    #[error("empty block id")]
    EmptyId,
    #[error("unterminated property list in {0:?}")]
    Unterminated(String),
    #[error("malformed property {0:?}, expected key=value")]
    MalformedProperty(String),
}

impl BlockState {
    /// Creates a state with no properties. A bare id gets the default namespace.
    pub fn new(block: impl Into<String>) -> Self {
        let block = block.into();
        let block = if block.contains(':') {
            block
        } else {
            format!("{DEFAULT_NAMESPACE}:{block}")
        };
        Self {
            block,
            properties: Vec::new(),
        }
    }

    /// Sets a property, replacing any previous value for `key`.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.properties.binary_search_by(|(k, _)| k.as_str().cmp(&key)) {
            Ok(i) => self.properties[i].1 = value,
            Err(i) => self.properties.insert(i, (key, value)),
        }
        self
    }

    /// Namespaced block id, e.g. `minecraft:stone`.
    pub fn block_id(&self) -> &str {
        &self.block
    }

    /// Value of a property, if set.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|i| self.properties[i].1.as_str())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block{{{}}}", self.block)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, (k, v)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{k}={v}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

impl FromStr for BlockState {
    type Err = StateParseError;

    /// Parses `ns:id` or `ns:id[key=value,...]`. The namespace is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (id, props) = match s.find('[') {
            Some(open) => {
                let rest = &s[open + 1..];
                let inner = rest
                    .strip_suffix(']')
                    .ok_or_else(|| StateParseError::Unterminated(s.to_string()))?;
                (&s[..open], Some(inner))
            }
            None => (s, None),
        };
        if id.is_empty() {
            return Err(StateParseError::EmptyId);
        }

        let mut state = BlockState::new(id);
        for prop in props.into_iter().flat_map(|p| p.split(',')) {
            let prop = prop.trim();
            if prop.is_empty() {
                continue;
            }
            let (k, v) = prop
                .split_once('=')
                .ok_or_else(|| StateParseError::MalformedProperty(prop.to_string()))?;
            state = state.with_property(k.trim(), v.trim());
        }
        Ok(state)
    }
}

// ---------------------------------------------------------------------------
// BlockTag
// ---------------------------------------------------------------------------

/// Opaque per-block metadata (block-entity data), stored as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTag(Map<String, Value>);

impl BlockTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for BlockTag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Map<String, Value> serialization cannot fail.
        let text = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// ---------------------------------------------------------------------------
// PlacementRule
// ---------------------------------------------------------------------------

/// How a group may be written over existing blocks.
///
/// `force` replaces anything; otherwise only ids in `overridden_blocks` (and
/// air, which the placer handles itself) may be replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRule {
    pub force: bool,
    pub overridden_blocks: Vec<String>,
}

impl PlacementRule {
    /// A rule that replaces any block.
    pub fn forced() -> Self {
        Self {
            force: true,
            overridden_blocks: Vec::new(),
        }
    }

    /// Adds a block id this rule may replace.
    pub fn overriding(mut self, block_id: impl Into<String>) -> Self {
        let id = block_id.into();
        if !self.overridden_blocks.contains(&id) {
            self.overridden_blocks.push(id);
        }
        self
    }

    /// Returns `true` if a block with `block_id` may be replaced.
    pub fn can_replace(&self, block_id: &str) -> bool {
        self.force || self.overridden_blocks.iter().any(|b| b == block_id)
    }
}

// ---------------------------------------------------------------------------
// BlockSample
// ---------------------------------------------------------------------------

/// What a world query returns for one position.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockSample {
    pub state: BlockState,
    pub tag: Option<BlockTag>,
}

impl BlockSample {
    pub fn new(state: BlockState) -> Self {
        Self { state, tag: None }
    }

    pub fn tagged(state: BlockState, tag: BlockTag) -> Self {
        Self {
            state,
            tag: Some(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    fn hash_of(state: &BlockState) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_bare_id_gets_namespace() {
        assert_eq!(BlockState::new("stone").block_id(), "minecraft:stone");
        assert_eq!(BlockState::new("mymod:ore").block_id(), "mymod:ore");
    }

    #[test]
    fn test_property_order_does_not_matter() {
        let a = BlockState::new("oak_stairs")
            .with_property("facing", "north")
            .with_property("half", "top");
        let b = BlockState::new("oak_stairs")
            .with_property("half", "top")
            .with_property("facing", "north");
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_property_replaced() {
        let state = BlockState::new("oak_log")
            .with_property("axis", "x")
            .with_property("axis", "y");
        assert_eq!(state.property("axis"), Some("y"));
        assert_eq!(state.properties().count(), 1);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(BlockState::new("stone").to_string(), "Block{minecraft:stone}");
        let stairs = BlockState::new("oak_stairs")
            .with_property("half", "top")
            .with_property("facing", "east");
        assert_eq!(
            stairs.to_string(),
            "Block{minecraft:oak_stairs}[facing=east,half=top]"
        );
    }

    #[test]
    fn test_parse() {
        let parsed: BlockState = "minecraft:oak_log[axis=y]".parse().unwrap();
        assert_eq!(parsed, BlockState::new("oak_log").with_property("axis", "y"));

        let bare: BlockState = "glass".parse().unwrap();
        assert_eq!(bare, BlockState::new("minecraft:glass"));

        assert_eq!("".parse::<BlockState>(), Err(StateParseError::EmptyId));
        assert!(matches!(
            "stone[axis=y".parse::<BlockState>(),
            Err(StateParseError::Unterminated(_))
        ));
        assert!(matches!(
            "stone[axis]".parse::<BlockState>(),
            Err(StateParseError::MalformedProperty(_))
        ));
    }

    #[test]
    fn test_tag_display_is_json() {
        let tag = BlockTag::new().with("Items", 3).with("CustomName", "chest");
        assert_eq!(tag.to_string(), r#"{"CustomName":"chest","Items":3}"#);
    }

    #[test]
    fn test_placement_rule() {
        let rule = PlacementRule::default().overriding("minecraft:dirt");
        assert!(rule.can_replace("minecraft:dirt"));
        assert!(!rule.can_replace("minecraft:stone"));
        assert!(PlacementRule::forced().can_replace("minecraft:bedrock"));

        let twice = PlacementRule::default()
            .overriding("minecraft:dirt")
            .overriding("minecraft:dirt");
        assert_eq!(twice.overridden_blocks.len(), 1);
    }
}
