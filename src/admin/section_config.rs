//! Draft editing of the section configuration.

use std::collections::BTreeSet;

use crate::admin::PanelError;
use crate::content::{Field, SectionConfig};
use crate::sync::SyncClient;

/// Holds unsaved edits on top of the client's current config.
pub struct SectionConfigEditor {
    sync: SyncClient,
    draft: SectionConfig,
    dirty: BTreeSet<String>,
}

impl SectionConfigEditor {
    pub fn new(sync: SyncClient) -> Self {
        let draft = (*sync.current()).clone();
        Self {
            sync,
            draft,
            dirty: BTreeSet::new(),
        }
    }

    pub fn draft(&self) -> &SectionConfig {
        &self.draft
    }

    /// Sections edited since the last save or reset.
    pub fn changed_sections(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Edit one stored field. Badge fields and card text only ever show
    /// their defaults, so they are rejected.
    pub fn set_field(
        &mut self,
        section: &str,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), PanelError> {
        if !field.is_stored() {
            return Err(PanelError::DisplayOnly(format!("{}.{}", section, field.key())));
        }
        self.draft.section_mut(section).set(field, value);
        self.dirty.insert(section.to_string());
        Ok(())
    }

    /// Drop unsaved edits and start over from the current config.
    pub fn reset(&mut self) {
        self.draft = (*self.sync.current()).clone();
        self.dirty.clear();
    }

    /// Save the changed sections, reload, and notify every view.
    /// Returns the sections saved; nothing is sent when nothing changed.
    pub async fn save(&mut self) -> Result<Vec<String>, PanelError> {
        if self.dirty.is_empty() {
            return Ok(Vec::new());
        }

        let mut changes = SectionConfig::new();
        for name in &self.dirty {
            if let Some(record) = self.draft.section(name) {
                changes.insert(name.clone(), record.clone());
            }
        }

        let saved = self.sync.save(&changes).await?;
        self.reset();
        Ok(saved)
    }
}
