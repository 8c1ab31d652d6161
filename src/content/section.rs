//! Section display configuration.
//!
//! A [`SectionConfig`] maps section identifiers to display strings. Parsing
//! is lenient: anything that is not a string where a string is expected is
//! dropped, and every lookup falls back to the built-in defaults and finally
//! to an empty string.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::content::defaults::default_section_config;

/// Sections the site knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Hero,
    About,
    Stats,
    Projects,
    Experience,
    Testimonials,
    Contact,
    ThankYou,
    Blogs,
    Awards,
    Education,
    Certifications,
    Skills,
}

impl SectionId {
    pub const ALL: [SectionId; 13] = [
        SectionId::Hero,
        SectionId::About,
        SectionId::Stats,
        SectionId::Projects,
        SectionId::Experience,
        SectionId::Testimonials,
        SectionId::Contact,
        SectionId::ThankYou,
        SectionId::Blogs,
        SectionId::Awards,
        SectionId::Education,
        SectionId::Certifications,
        SectionId::Skills,
    ];

    /// Key used in the configuration map.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::About => "about",
            SectionId::Stats => "stats",
            SectionId::Projects => "projects",
            SectionId::Experience => "experience",
            SectionId::Testimonials => "testimonials",
            SectionId::Contact => "contact",
            SectionId::ThankYou => "thankYou",
            SectionId::Blogs => "blogs",
            SectionId::Awards => "awards",
            SectionId::Education => "education",
            SectionId::Certifications => "certifications",
            SectionId::Skills => "skills",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s || (s == "thank_you" && *id == SectionId::ThankYou))
            .ok_or_else(|| format!("unknown section '{}'", s))
    }
}

/// Top-level text fields of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Subtitle,
    Description,
    MainTitle,
    Emoji,
    Badge,
    BadgeEmoji,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Subtitle,
        Field::Description,
        Field::MainTitle,
        Field::Emoji,
        Field::Badge,
        Field::BadgeEmoji,
    ];

    /// Key in the configuration object.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::Description => "description",
            Field::MainTitle => "mainTitle",
            Field::Emoji => "emoji",
            Field::Badge => "badge",
            Field::BadgeEmoji => "badgeEmoji",
        }
    }

    /// True for fields the section-titles rows persist. Badges are
    /// display-only defaults.
    pub fn is_stored(&self) -> bool {
        !matches!(self, Field::Badge | Field::BadgeEmoji)
    }

    /// Key in the section-titles wire format, when the field is stored there.
    fn wire_key(&self) -> &'static str {
        match self {
            Field::MainTitle => "main_title",
            Field::BadgeEmoji => "badge_emoji",
            other => other.key(),
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.key() == s || f.wire_key() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Text fields of a nested card (e.g. `about.whoIAm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Title,
    Description,
}

impl FromStr for CardField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(CardField::Title),
            "description" => Ok(CardField::Description),
            other => Err(format!("unknown card field '{}'", other)),
        }
    }
}

/// Nested card inside a multi-card section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CardRecord {
    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            title: string_field(object, &["title"]),
            description: string_field(object, &["description"]),
        }
    }

    pub fn get(&self, field: CardField) -> Option<&str> {
        match field {
            CardField::Title => self.title.as_deref(),
            CardField::Description => self.description.as_deref(),
        }
    }

    pub fn set(&mut self, field: CardField, value: impl Into<String>) {
        let slot = match field {
            CardField::Title => &mut self.title,
            CardField::Description => &mut self.description,
        };
        *slot = Some(value.into());
    }
}

/// Display strings of one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge_emoji: Option<String>,
    #[serde(flatten)]
    pub cards: BTreeMap<String, CardRecord>,
}

impl SectionRecord {
    /// Parse a section object. Accepts camelCase and snake_case keys; any
    /// other object-valued key becomes a card.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut record = Self::default();
        for field in Field::ALL {
            record.set_opt(field, string_field(object, &[field.key(), field.wire_key()]));
        }
        for (key, value) in object {
            if let Value::Object(card) = value {
                record.cards.insert(key.clone(), CardRecord::from_object(card));
            }
        }
        record
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Subtitle => self.subtitle.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::MainTitle => self.main_title.as_deref(),
            Field::Emoji => self.emoji.as_deref(),
            Field::Badge => self.badge.as_deref(),
            Field::BadgeEmoji => self.badge_emoji.as_deref(),
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.set_opt(field, Some(value.into()));
    }

    fn set_opt(&mut self, field: Field, value: Option<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Subtitle => &mut self.subtitle,
            Field::Description => &mut self.description,
            Field::MainTitle => &mut self.main_title,
            Field::Emoji => &mut self.emoji,
            Field::Badge => &mut self.badge,
            Field::BadgeEmoji => &mut self.badge_emoji,
        };
        *slot = value;
    }
}

/// Resolved heading of a section, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeading {
    pub title: String,
    pub main_title: String,
    pub subtitle: String,
    pub description: String,
    pub emoji: String,
}

/// The full section configuration (canonical snapshot).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionConfig {
    sections: BTreeMap<String, SectionRecord>,
}

impl SectionConfig {
    /// An empty configuration; every lookup falls back to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in defaults.
    pub fn defaults() -> &'static SectionConfig {
        default_section_config()
    }

    /// Normalize an API response.
    ///
    /// Accepts `{ "config": {...} }`, the config object itself, or a list of
    /// section-title rows. Returns `None` for anything else.
    pub fn from_response(value: &Value) -> Option<Self> {
        match value {
            Value::Array(rows) => Some(Self::from_section_titles(rows)),
            Value::Object(object) => match object.get("config") {
                Some(Value::Object(inner)) => Some(Self::from_object(inner)),
                _ => Some(Self::from_object(object)),
            },
            _ => None,
        }
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let sections = object
            .iter()
            .filter_map(|(name, value)| match value {
                Value::Object(section) => Some((name.clone(), SectionRecord::from_object(section))),
                _ => None,
            })
            .collect();
        Self { sections }
    }

    fn from_section_titles(rows: &[Value]) -> Self {
        let mut config = Self::new();
        for row in rows {
            let Value::Object(row) = row else { continue };
            let Some(name) = string_field(row, &["section_name"]) else {
                continue;
            };
            if row.get("is_active").and_then(Value::as_bool) == Some(false) {
                continue;
            }
            config.insert(name, SectionRecord::from_object(row));
        }
        config
    }

    pub fn insert(&mut self, name: impl Into<String>, record: SectionRecord) {
        self.sections.insert(name.into(), record);
    }

    pub fn section(&self, name: &str) -> Option<&SectionRecord> {
        self.sections.get(name)
    }

    /// Mutable access, creating an empty record when missing.
    pub fn section_mut(&mut self, name: &str) -> &mut SectionRecord {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SectionRecord)> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Resolve a field: configured value, then default, then `""`.
    /// Empty configured strings count as missing.
    pub fn text<'a>(&'a self, section: &str, field: Field) -> &'a str {
        non_empty(self.section(section).and_then(|r| r.get(field)))
            .or_else(|| non_empty(Self::defaults().section(section).and_then(|r| r.get(field))))
            .unwrap_or("")
    }

    /// Resolve a card field with the same fallback chain as [`text`](Self::text).
    pub fn card_text<'a>(&'a self, section: &str, card: &str, field: CardField) -> &'a str {
        let lookup = |config: &'a SectionConfig| {
            non_empty(
                config
                    .section(section)
                    .and_then(|r| r.cards.get(card))
                    .and_then(|c| c.get(field)),
            )
        };
        lookup(self)
            .or_else(|| lookup(Self::defaults()))
            .unwrap_or("")
    }

    /// Resolved heading of a section.
    pub fn heading(&self, section: &str) -> SectionHeading {
        SectionHeading {
            title: self.text(section, Field::Title).to_string(),
            main_title: self.text(section, Field::MainTitle).to_string(),
            subtitle: self.text(section, Field::Subtitle).to_string(),
            description: self.text(section, Field::Description).to_string(),
            emoji: self.text(section, Field::Emoji).to_string(),
        }
    }

    /// JSON form (`{ "hero": { "title": ... }, ... }`).
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn string_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
