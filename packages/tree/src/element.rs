use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Depth assigned to the root element
pub const ROOT_DEPTH: u32 = 0;

/// Horizontal layout hint, inherited by descendants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

/// Payload of a single mind-map node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(deserialize_with = "de_id")]
    pub id: String,

    /// Text sections, rendered top to bottom
    #[serde(default)]
    pub texts: Vec<String>,

    // Geometry is owned by the layout collaborator.
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub section_heights: Vec<f64>,

    /// Distance from the root (root = 0)
    #[serde(default)]
    pub depth: u32,

    /// Index among siblings
    #[serde(default)]
    pub order: u32,

    /// Cached number of direct children
    #[serde(default, rename = "children")]
    pub child_count: u32,

    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub editing: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Provisionally staged, awaiting confirm or cancel
    #[serde(default)]
    pub tentative: bool,

    #[serde(default)]
    pub direction: Direction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,

    /// Opaque styling data, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

fn default_visible() -> bool {
    true
}

impl Element {
    /// Create a visible element with the given text sections
    pub fn new(id: impl Into<String>, texts: Vec<String>) -> Self {
        let section_heights = vec![0.0; texts.len()];
        Self {
            id: id.into(),
            texts,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            section_heights,
            depth: ROOT_DEPTH,
            order: 0,
            child_count: 0,
            selected: false,
            editing: false,
            visible: true,
            tentative: false,
            direction: Direction::None,
            marker: None,
            style: None,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// First text section, or an empty string
    pub fn title(&self) -> &str {
        self.texts.first().map(String::as_str).unwrap_or("")
    }

    pub fn is_root(&self) -> bool {
        self.depth == ROOT_DEPTH
    }
}

/// Accept string or numeric ids; legacy documents stored them as numbers.
pub(crate) fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("invalid element id: {}", other))),
    }
}

pub(crate) fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!("invalid parent id: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_json_uses_camel_case() {
        let mut elem = Element::new("1", vec!["Root".to_string()]);
        elem.child_count = 2;

        let json = serde_json::to_value(&elem).unwrap();
        assert_eq!(json["children"], 2);
        assert_eq!(json["sectionHeights"], serde_json::json!([0.0]));
        assert!(json.get("marker").is_none());
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let elem: Element = serde_json::from_value(serde_json::json!({
            "id": 42,
            "texts": ["hello"]
        }))
        .unwrap();

        assert_eq!(elem.id, "42");
        assert!(elem.visible);
        assert_eq!(elem.direction, Direction::None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result: Result<Element, _> =
            serde_json::from_value(serde_json::json!({ "texts": ["orphan"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let result: Result<Element, _> = serde_json::from_value(serde_json::json!({ "id": "" }));
        assert!(result.is_err());
    }
}
