//! Built-in section texts used until (and wherever) the API has none.

use std::sync::OnceLock;

use crate::content::section::{CardRecord, SectionConfig, SectionRecord};

static DEFAULTS: OnceLock<SectionConfig> = OnceLock::new();

/// The hardcoded default configuration.
pub fn default_section_config() -> &'static SectionConfig {
    DEFAULTS.get_or_init(build_defaults)
}

fn record(title: &str, main_title: Option<&str>, description: &str) -> SectionRecord {
    SectionRecord {
        title: Some(title.to_string()),
        main_title: main_title.map(str::to_string),
        description: Some(description.to_string()),
        ..SectionRecord::default()
    }
}

fn card(title: &str, description: &str) -> CardRecord {
    CardRecord {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
    }
}

fn build_defaults() -> SectionConfig {
    let mut config = SectionConfig::new();

    config.insert(
        "hero",
        SectionRecord {
            title: Some("I Am Rahul Raj".into()),
            subtitle: Some("AVP Product".into()),
            description: Some(
                "Software Alchemist crafting digital experiences that users love & businesses value"
                    .into(),
            ),
            badge: Some("Welcome to My Universe".into()),
            badge_emoji: Some("✨".into()),
            ..SectionRecord::default()
        },
    );

    let mut about = record(
        "Get to Know Me",
        None,
        "A glimpse into my world of innovation and creativity",
    );
    about.cards.insert(
        "whoIAm".into(),
        card(
            "Who I Am",
            "Product manager with designer's heart, diplomat's tongue & engineer's brain",
        ),
    );
    about.cards.insert(
        "whatIDo".into(),
        card(
            "What I Do",
            "Craft digital experiences that users love & businesses value",
        ),
    );
    about.cards.insert(
        "whatInterestsMe".into(),
        card(
            "What Interests Me",
            "Emerging tech, AI possibilities & real-world impact solutions",
        ),
    );
    config.insert("about", about);

    config.insert(
        "stats",
        record(
            "My Journey",
            Some("Achievements & Skills"),
            "A glimpse into my professional journey and expertise",
        ),
    );
    config.insert(
        "projects",
        record(
            "My Creations",
            Some("Amazing Projects"),
            "Check out some of my favorite projects and creations! 🚀",
        ),
    );
    config.insert(
        "experience",
        record(
            "My Journey",
            Some("My Adventure So Far"),
            "A colorful journey through the world of product management and innovation! 🌈",
        ),
    );
    config.insert(
        "testimonials",
        record(
            "What People Say",
            Some("Lovely Testimonials"),
            "Hear what amazing people have to say about working with me! 💬",
        ),
    );
    config.insert(
        "contact",
        record(
            "Get In Touch",
            Some("Let's Connect"),
            "Ready to work together? Let's create something amazing! 🚀",
        ),
    );
    config.insert(
        "blogs",
        record(
            "Blogs",
            Some("My Blog Posts"),
            "Read my latest articles and thoughts",
        ),
    );
    config.insert("awards", record("Awards", None, "My awards and recognition"));
    config.insert("education", record("Education", None, "My educational background"));
    config.insert("certifications", record("Certifications", None, "My certifications"));
    config.insert("skills", record("Skills", None, "My technical skills"));

    let mut thank_you = record(
        "Thank You",
        Some("Thanks for Reaching Out!"),
        "I'll get back to you as soon as possible. In the meantime, feel free to explore more of my work!",
    );
    thank_you.emoji = Some("🎉".into());
    config.insert("thankYou", thank_you);

    config
}
