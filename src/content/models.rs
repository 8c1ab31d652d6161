//! Typed content records managed through the admin panels.
//!
//! Field names follow the backend's JSON. Every struct tolerates missing
//! fields on input (`#[serde(default)]`) and omits unset optionals on output,
//! so the same type serves list responses and create/update payloads.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kinds of content the API manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Hero,
    About,
    Experience,
    Stat,
    Testimonial,
    Project,
    ContactInfo,
    Award,
    Education,
    Certification,
    Skill,
    Blog,
    Enquiry,
    SectionTitle,
}

impl ContentKind {
    /// Path used to list and create records.
    pub fn collection_path(&self) -> &'static str {
        match self {
            ContentKind::Hero => "/api/hero",
            ContentKind::About => "/api/about",
            ContentKind::Experience => "/api/experiences",
            ContentKind::Stat => "/api/stats",
            ContentKind::Testimonial => "/api/testimonials",
            ContentKind::Project => "/api/projects",
            ContentKind::ContactInfo => "/api/admin/contact-info",
            ContentKind::Award => "/api/awards",
            ContentKind::Education => "/api/education",
            ContentKind::Certification => "/api/certifications",
            ContentKind::Skill => "/api/skills",
            ContentKind::Blog => "/api/blogs",
            ContentKind::Enquiry => "/api/admin/contacts",
            ContentKind::SectionTitle => "/api/section-titles",
        }
    }

    /// Path of one record.
    pub fn member_path(&self, id: i64) -> String {
        format!("{}/{}", self.collection_path(), id)
    }

    /// Section whose heading labels this content on the public site.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            ContentKind::Hero => Some("hero"),
            ContentKind::About => Some("about"),
            ContentKind::Experience => Some("experience"),
            ContentKind::Stat => Some("stats"),
            ContentKind::Testimonial => Some("testimonials"),
            ContentKind::Project => Some("projects"),
            ContentKind::ContactInfo => Some("contact"),
            ContentKind::Award => Some("awards"),
            ContentKind::Education => Some("education"),
            ContentKind::Certification => Some("certifications"),
            ContentKind::Skill => Some("skills"),
            ContentKind::Blog => Some("blogs"),
            ContentKind::Enquiry | ContentKind::SectionTitle => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Hero => "hero",
            ContentKind::About => "about",
            ContentKind::Experience => "experience",
            ContentKind::Stat => "stat",
            ContentKind::Testimonial => "testimonial",
            ContentKind::Project => "project",
            ContentKind::ContactInfo => "contact_info",
            ContentKind::Award => "award",
            ContentKind::Education => "education",
            ContentKind::Certification => "certification",
            ContentKind::Skill => "skill",
            ContentKind::Blog => "blog",
            ContentKind::Enquiry => "enquiry",
            ContentKind::SectionTitle => "section_title",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A required field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check that every listed field is non-blank.
pub fn require(fields: &[(&'static str, &str)]) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldError {
            field: *field,
            message: "is required".to_string(),
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// New position of one record in a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: i64,
    pub order_index: i64,
}

/// A record an admin panel can list, create, update and delete.
pub trait ContentItem: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: ContentKind;

    /// Server-assigned id; `None` for a record not yet created.
    fn id(&self) -> Option<i64>;

    /// Synchronous pre-submit validation.
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub badge: String,
    pub badge_emoji: String,
    pub cta_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContentItem for Hero {
    const KIND: ContentKind = ContentKind::Hero;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("title", &self.title),
            ("subtitle", &self.subtitle),
            ("description", &self.description),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
}

impl ContentItem for About {
    const KIND: ContentKind = ContentKind::About;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("title", &self.title), ("description", &self.description)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Experience {
    const KIND: ContentKind = ContentKind::Experience;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("company", &self.company),
            ("position", &self.position),
            ("duration", &self.duration),
            ("description", &self.description),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub label: String,
    pub value: String,
    pub suffix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Stat {
    const KIND: ContentKind = ContentKind::Stat;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("label", &self.label), ("value", &self.value)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Testimonial {
    const KIND: ContentKind = ContentKind::Testimonial;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("name", &self.name), ("message", &self.message)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    /// Comma-separated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl Project {
    pub fn technology_list(&self) -> Vec<&str> {
        split_list(self.technologies.as_deref().unwrap_or(""))
    }
}

impl ContentItem for Project {
    const KIND: ContentKind = ContentKind::Project;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("title", &self.title), ("description", &self.description)])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// email, phone, address, website, linkedin, github, twitter, other
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for ContactInfo {
    const KIND: ContentKind = ContentKind::ContactInfo;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("type", &self.kind),
            ("value", &self.value),
            ("label", &self.label),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub organization: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Award {
    const KIND: ContentKind = ContentKind::Award;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("title", &self.title),
            ("organization", &self.organization),
            ("year", &self.year),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub degree: String,
    pub institution: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Education {
    const KIND: ContentKind = ContentKind::Education;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("degree", &self.degree),
            ("institution", &self.institution),
            ("year", &self.year),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub issuer: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Certification {
    const KIND: ContentKind = ContentKind::Certification;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("name", &self.name),
            ("issuer", &self.issuer),
            ("year", &self.year),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub category: String,
    /// Comma-separated.
    pub skills: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl Skill {
    pub fn skill_list(&self) -> Vec<&str> {
        split_list(&self.skills)
    }
}

impl ContentItem for Skill {
    const KIND: ContentKind = ContentKind::Skill;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("category", &self.category), ("skills", &self.skills)])
    }
}

/// A linked article; the backend fills title and thumbnail from the URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for Blog {
    const KIND: ContentKind = ContentKind::Blog;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("url", &self.url)])?;
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(vec![FieldError {
                field: "url",
                message: "must be an http(s) URL".to_string(),
            }]);
        }
        Ok(())
    }
}

/// A contact-form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enquiry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ContentItem for Enquiry {
    const KIND: ContentKind = ContentKind::Enquiry;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ])?;
        if !self.email.contains('@') {
            return Err(vec![FieldError {
                field: "email",
                message: "must be an email address".to_string(),
            }]);
        }
        Ok(())
    }
}

/// One row of the section-titles table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionTitle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub section_name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

impl ContentItem for SectionTitle {
    const KIND: ContentKind = ContentKind::SectionTitle;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        require(&[("section_name", &self.section_name), ("title", &self.title)])
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
