//! Site content: section display configuration and typed records.
//!
//! # Design Decisions
//! - `SectionConfig` is parsed leniently and always resolves to text,
//!   falling back to built-in defaults
//! - Content records keep the backend's field names so they serialize
//!   straight into request bodies

pub mod defaults;
pub mod models;
pub mod section;

pub use defaults::default_section_config;
pub use models::{
    About, Award, Blog, Certification, ContactInfo, ContentItem, ContentKind, Education, Enquiry,
    Experience, FieldError, Hero, OrderUpdate, Project, SectionTitle, Skill, Stat, Testimonial,
};
pub use section::{CardField, CardRecord, Field, SectionConfig, SectionHeading, SectionId, SectionRecord};
