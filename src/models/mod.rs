use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub(crate) type TopicId = i64;
pub(crate) type BlockId = i64;

/// Backend user object returned by `/auth/login`.
///
/// The backend does not pin its shape down, so we keep it as opaque JSON and
/// only read the few fields the UI shows.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl AccountInfo {
    pub fn fallback(email: &str, role: Role) -> Self {
        Self {
            extra: serde_json::json!({ "email": email, "role": role }),
        }
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    pub fn display_name(&self) -> &str {
        self.get_str("name")
            .or_else(|| self.email())
            .unwrap_or("Admin")
    }

    pub fn role(&self) -> Option<Role> {
        self.extra
            .get("role")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    #[default]
    #[serde(other)]
    Visitor,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Topic {
    pub id: TopicId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<TopicId>,
    #[serde(default)]
    pub order_no: u32,

    /// Slash-joined slugs from the root topic. Root listings sometimes omit it.
    #[serde(default)]
    pub full_path: String,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl Topic {
    /// Path used for `/topic/...` links.
    pub fn path(&self) -> &str {
        if self.full_path.trim().is_empty() {
            &self.slug
        } else {
            &self.full_path
        }
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description provided.")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub(crate) struct BlockMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_read_time: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ContentBlock {
    pub id: BlockId,
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub block_order: u32,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub metadata: BlockMetadata,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TopicDetail {
    pub topic: Topic,
    pub children: Vec<Topic>,
    pub blocks: Vec<ContentBlock>,
}

/// The seven component kinds a content block can carry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum BlockKind {
    Heading,
    Paragraph,
    Example,
    Note,
    Code,
    Image,
    Carousel,
}

impl BlockKind {
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Heading => "Heading",
            BlockKind::Paragraph => "Paragraph",
            BlockKind::Example => "Example",
            BlockKind::Note => "Note",
            BlockKind::Code => "Code Block",
            BlockKind::Image => "Image",
            BlockKind::Carousel => "Image Carousel",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            BlockKind::Heading => "📝",
            BlockKind::Paragraph => "📄",
            BlockKind::Example => "💡",
            BlockKind::Note => "📌",
            BlockKind::Code => "💻",
            BlockKind::Image => "🖼️",
            BlockKind::Carousel => "🎠",
        }
    }
}

/// Heading level, 1..=6. Serialized as `"h2"`; `2` and `"2"` are accepted too.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u64) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn tag(self) -> String {
        format!("h{}", self.0)
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(2)
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.tag())
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Text(String),
        }

        let level = match Raw::deserialize(deserializer)? {
            Raw::Num(n) => n,
            Raw::Text(s) => {
                let t = s.trim();
                let t = t
                    .strip_prefix('h')
                    .or_else(|| t.strip_prefix('H'))
                    .unwrap_or(t);
                t.parse::<u64>()
                    .map_err(|_| de::Error::custom(format!("invalid heading level `{s}`")))?
            }
        };

        HeadingLevel::new(level)
            .ok_or_else(|| de::Error::custom(format!("heading level {level} out of range")))
    }
}

/// One typed component inside a content block.
///
/// Wire form is `{ "type": "<kind>", "content": { ... } }`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub(crate) enum Component {
    Heading {
        #[serde(default)]
        text: String,
        #[serde(default)]
        level: HeadingLevel,
    },
    Paragraph {
        #[serde(default)]
        text: String,
    },
    Example {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
    },
    Note {
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
        #[serde(rename = "type", default = "default_note_tone")]
        tone: String,
    },
    Code {
        #[serde(default)]
        language: String,
        #[serde(default)]
        code: String,
    },
    Image {
        #[serde(default)]
        url: String,
        #[serde(default)]
        alt: String,
        #[serde(default)]
        caption: String,
    },
    Carousel {
        #[serde(default)]
        images: Vec<String>,
    },
}

fn default_note_tone() -> String {
    "info".to_string()
}

impl Component {
    /// A blank component of the given kind, as the editor palette creates it.
    pub fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Heading => Component::Heading {
                text: String::new(),
                level: HeadingLevel::default(),
            },
            BlockKind::Paragraph => Component::Paragraph {
                text: String::new(),
            },
            BlockKind::Example => Component::Example {
                title: String::new(),
                content: String::new(),
            },
            BlockKind::Note => Component::Note {
                title: String::new(),
                content: String::new(),
                tone: default_note_tone(),
            },
            BlockKind::Code => Component::Code {
                language: "python".to_string(),
                code: String::new(),
            },
            BlockKind::Image => Component::Image {
                url: String::new(),
                alt: String::new(),
                caption: String::new(),
            },
            BlockKind::Carousel => Component::Carousel {
                images: vec![String::new(); 3],
            },
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Component::Heading { .. } => BlockKind::Heading,
            Component::Paragraph { .. } => BlockKind::Paragraph,
            Component::Example { .. } => BlockKind::Example,
            Component::Note { .. } => BlockKind::Note,
            Component::Code { .. } => BlockKind::Code,
            Component::Image { .. } => BlockKind::Image,
            Component::Carousel { .. } => BlockKind::Carousel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_code_component_round_trips_language_and_code() {
        let original = Component::Code {
            language: "rust".to_string(),
            code: "fn main() {\n    println!(\"hi\");\n}".to_string(),
        };
        let wire = serde_json::to_string(&original).expect("should serialize");
        let back: Component = serde_json::from_str(&wire).expect("should deserialize");
        assert_eq!(back, original);
    }

    #[test]
    fn test_component_wire_shape_is_type_plus_content() {
        let v = serde_json::to_value(Component::Image {
            url: "https://x/y.png".to_string(),
            alt: "y".to_string(),
            caption: String::new(),
        })
        .expect("should serialize");
        assert_eq!(v["type"], "image");
        assert_eq!(v["content"]["url"], "https://x/y.png");
    }

    #[test]
    fn test_heading_level_accepts_tag_and_number() {
        let a: Component =
            serde_json::from_str(r#"{"type":"heading","content":{"text":"T","level":"h3"}}"#)
                .expect("tag form");
        let b: Component =
            serde_json::from_str(r#"{"type":"heading","content":{"text":"T","level":3}}"#)
                .expect("numeric form");
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_value(&a).expect("serialize")["content"]["level"],
            "h3"
        );
    }

    #[test]
    fn test_heading_level_out_of_range_is_rejected() {
        let r: Result<Component, _> =
            serde_json::from_str(r#"{"type":"heading","content":{"text":"T","level":"h9"}}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_note_tone_defaults_to_info() {
        let c: Component =
            serde_json::from_str(r#"{"type":"note","content":{"title":"a","content":"b"}}"#)
                .expect("should parse");
        match c {
            Component::Note { tone, .. } => assert_eq!(tone, "info"),
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn test_component_ignores_sibling_order_field() {
        let c: Component = serde_json::from_str(
            r#"{"type":"paragraph","order_no":4,"content":{"text":"hello"}}"#,
        )
        .expect("should parse");
        assert_eq!(
            c,
            Component::Paragraph {
                text: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_empty_component_matches_its_kind() {
        for kind in BlockKind::iter() {
            assert_eq!(Component::empty(kind).kind(), kind);
            assert_eq!(BlockKind::from_str(kind.as_ref()).ok(), Some(kind));
        }
    }

    #[test]
    fn test_topic_path_falls_back_to_slug() {
        let t: Topic =
            serde_json::from_str(r#"{"id":1,"title":"Python","slug":"python","order_no":0}"#)
                .expect("should parse");
        assert_eq!(t.path(), "python");
        assert!(t.parent_id.is_none());
        assert_eq!(t.description_or_default(), "No description provided.");
    }

    #[test]
    fn test_account_info_display_name_prefers_name_then_email() {
        let named = AccountInfo {
            extra: serde_json::json!({"name": "Ada", "email": "ada@x.io"}),
        };
        assert_eq!(named.display_name(), "Ada");

        let fallback = AccountInfo::fallback("ada@x.io", Role::Admin);
        assert_eq!(fallback.display_name(), "ada@x.io");
        assert_eq!(fallback.role(), Some(Role::Admin));
    }

    #[test]
    fn test_unknown_role_maps_to_visitor() {
        let r: Role = serde_json::from_str(r#""editor""#).expect("should parse");
        assert_eq!(r, Role::Visitor);
    }
}
