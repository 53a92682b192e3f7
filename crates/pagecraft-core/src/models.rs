//! Data models for Pagecraft
//!
//! Defines the page structure: a `Block` is a page section owning an ordered
//! list of `Element`s. These are plain data; nothing here validates content.
//!
//! The serde layout is the persisted format: tags are written as their
//! snake_case strings and the tag field is named `type`.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of page section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Banner,
    ProductList,
    Text,
}

impl BlockType {
    /// All block types, in declaration order
    pub const ALL: [BlockType; 3] = [BlockType::Banner, BlockType::ProductList, BlockType::Text];

    /// The tag written to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Banner => "banner",
            BlockType::ProductList => "product_list",
            BlockType::Text => "text",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag::new("block type", s))
    }
}

/// Kind of item placed inside a block
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Banner,
    Product,
    Text,
}

impl ElementType {
    /// All element types, in declaration order
    pub const ALL: [ElementType; 3] = [ElementType::Banner, ElementType::Product, ElementType::Text];

    /// The tag written to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Banner => "banner",
            ElementType::Product => "product",
            ElementType::Text => "text",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag::new("element type", s))
    }
}

/// A tag string that names no known block or element type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownTag {
    kind: &'static str,
    value: String,
}

impl UnknownTag {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Grid sizing hints for a block
///
/// Values are expected to be non-negative; the store does not check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub columns: f64,
    pub rows: f64,
    pub gap: f64,
}

impl Layout {
    pub fn new(columns: f64, rows: f64, gap: f64) -> Self {
        Self { columns, rows, gap }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(1.0, 1.0, 0.0)
    }
}

/// Placement of an element within its block
///
/// Units and coordinate system belong to the renderer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// An item placed within a block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Identifier, unique within the parent block by convention only
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    /// Payload whose shape depends on `kind`; stored as-is
    ///
    /// A missing `content` key reads as `null`.
    #[serde(default)]
    pub content: Value,
    pub position: Position,
}

impl Element {
    /// Create an element with empty (`null`) content
    pub fn new(id: impl Into<String>, kind: ElementType, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            content: Value::Null,
            position,
        }
    }

    /// Replace the content payload
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    /// Interpret the content payload as a concrete type
    pub fn content_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.content)
    }
}

/// A page section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Identifier supplied by the creator
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub title: String,
    pub layout: Layout,
    /// Display order is vector order
    pub elements: Vec<Element>,
}

impl Block {
    /// Create a block with the default layout and no elements
    pub fn new(id: impl Into<String>, kind: BlockType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            layout: Layout::default(),
            elements: Vec::new(),
        }
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Append an element (no id uniqueness check)
    pub fn add_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Remove every element with the given id
    ///
    /// Returns the number of elements removed.
    pub fn remove_element(&mut self, element_id: &str) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != element_id);
        before - self.elements.len()
    }

    /// First element with the given id
    pub fn get_element(&self, element_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    /// Path of the first NaN or infinite number in the block, if any
    ///
    /// JSON has no spelling for these; serde_json writes them as `null`,
    /// which does not read back as a number.
    pub fn non_finite_field(&self) -> Option<String> {
        let layout = [
            ("columns", self.layout.columns),
            ("rows", self.layout.rows),
            ("gap", self.layout.gap),
        ];
        if let Some((name, _)) = layout.iter().find(|(_, v)| !v.is_finite()) {
            return Some(format!("layout.{}", name));
        }

        self.elements.iter().find_map(|element| {
            let p = element.position;
            [
                ("x", p.x),
                ("y", p.y),
                ("width", p.width),
                ("height", p.height),
            ]
            .into_iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| format!("elements[{}].position.{}", element.id, name))
        })
    }
}
