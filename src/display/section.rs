//! Load-state machine for one public section.

use crate::api::{ApiClient, ResourceApi};
use crate::content::{ContentItem, SectionConfig, SectionHeading};

/// What a public section shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionView<T> {
    Loading,
    Failed { message: String },
    Empty,
    Ready(Vec<T>),
}

impl<T> SectionView<T> {
    fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            SectionView::Empty
        } else {
            SectionView::Ready(items)
        }
    }

    fn is_loaded(&self) -> bool {
        matches!(self, SectionView::Empty | SectionView::Ready(_))
    }
}

pub struct PublicSection<T: ContentItem> {
    resource: ResourceApi<T>,
    section: &'static str,
    view: SectionView<T>,
}

impl<T: ContentItem> PublicSection<T> {
    /// A section labelled by the config entry matching `T`'s kind.
    pub fn new(api: ApiClient) -> Self {
        let section = T::KIND.section().unwrap_or_else(|| T::KIND.as_str());
        Self::with_section(api, section)
    }

    pub fn with_section(api: ApiClient, section: &'static str) -> Self {
        Self {
            resource: ResourceApi::new(api),
            section,
            view: SectionView::Loading,
        }
    }

    pub fn view(&self) -> &SectionView<T> {
        &self.view
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    /// Fetch the list, replacing whatever was shown.
    pub async fn load(&mut self) -> &SectionView<T> {
        self.view = SectionView::Loading;
        self.view = match self.resource.list().await {
            Ok(items) => SectionView::from_items(items),
            Err(e) => {
                tracing::warn!(section = self.section, error = %e, "Section load failed");
                SectionView::Failed {
                    message: e.to_string(),
                }
            }
        };
        &self.view
    }

    /// Fetch again. A failure after a successful load keeps the items.
    pub async fn refresh(&mut self) -> &SectionView<T> {
        if !self.view.is_loaded() {
            return self.load().await;
        }
        match self.resource.list().await {
            Ok(items) => self.view = SectionView::from_items(items),
            Err(e) => {
                tracing::warn!(section = self.section, error = %e, "Section refresh failed, keeping items");
            }
        }
        &self.view
    }

    /// Heading resolved against `config`, falling back to defaults.
    pub fn heading(&self, config: &SectionConfig) -> SectionHeading {
        config.heading(self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Credentials;
    use crate::config::ApiConfig;
    use crate::content::{Experience, Field, Stat};
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn api() -> ApiClient {
        let creds = Credentials::new(Arc::new(MemoryStore::new()), "adminToken");
        ApiClient::new(&ApiConfig::default(), creds).unwrap()
    }

    #[test]
    fn test_heading_follows_config() {
        let section: PublicSection<Experience> = PublicSection::new(api());
        assert_eq!(section.section(), "experience");
        assert_eq!(section.view(), &SectionView::Loading);

        let defaults = SectionConfig::new();
        assert_eq!(section.heading(&defaults).title, "My Journey");

        let config = SectionConfig::from_response(&json!({
            "experience": { "title": "Career", "mainTitle": "" }
        }))
        .unwrap();
        let heading = section.heading(&config);
        assert_eq!(heading.title, "Career");
        assert_eq!(heading.main_title, "My Adventure So Far");
        assert_eq!(config.text("experience", Field::Emoji), "");
    }

    #[test]
    fn test_stats_section_name() {
        let section: PublicSection<Stat> = PublicSection::new(api());
        assert_eq!(section.section(), "stats");
    }
}
