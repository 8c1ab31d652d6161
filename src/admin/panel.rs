//! Generic optimistic CRUD panel.

use crate::admin::PanelError;
use crate::api::{ApiClient, ResourceApi};
use crate::content::{About, ContentItem, FieldError, OrderUpdate};
use crate::observability::metrics;
use crate::sync::SyncClient;

/// List state plus the edit workflow for one content type.
pub struct CrudPanel<T: ContentItem> {
    resource: ResourceApi<T>,
    items: Vec<T>,
    notifier: Option<SyncClient>,
}

impl<T: ContentItem> CrudPanel<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            resource: ResourceApi::new(api),
            items: Vec::new(),
            notifier: None,
        }
    }

    /// Publish a sync notification after every successful mutation.
    pub fn with_notifier(mut self, sync: SyncClient) -> Self {
        self.notifier = Some(sync);
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the list with the server's.
    pub async fn load(&mut self) -> Result<&[T], PanelError> {
        self.items = self.resource.list().await?;
        tracing::debug!(kind = T::KIND.as_str(), count = self.items.len(), "Panel loaded");
        Ok(&self.items)
    }

    /// Create (`id` unset) or update (`id` set) a record.
    ///
    /// The list is patched before the request; a failed request restores
    /// it. A successful one is reconciled with an authoritative refetch.
    pub async fn submit(&mut self, item: T) -> Result<T, PanelError> {
        item.validate().map_err(PanelError::Invalid)?;

        let snapshot = self.items.clone();
        let slot = match item.id().and_then(|id| self.position(id)) {
            Some(index) => {
                self.items[index] = item.clone();
                index
            }
            None => {
                self.items.push(item.clone());
                self.items.len() - 1
            }
        };

        match self.resource.upsert(&item).await {
            Ok(saved) => {
                self.items[slot] = saved.clone();
                tracing::info!(kind = T::KIND.as_str(), id = ?saved.id(), "Record saved");
                self.reconcile().await;
                self.notify();
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(kind = T::KIND.as_str(), error = %e, "Save failed, rolling back");
                self.items = snapshot;
                Err(e.into())
            }
        }
    }

    /// Delete a record, optimistically removing it first.
    pub async fn delete(&mut self, id: i64) -> Result<(), PanelError> {
        let snapshot = self.items.clone();
        self.items.retain(|item| item.id() != Some(id));

        match self.resource.delete(id).await {
            Ok(()) => {
                tracing::info!(kind = T::KIND.as_str(), id, "Record deleted");
                self.reconcile().await;
                self.notify();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = T::KIND.as_str(), id, error = %e, "Delete failed, rolling back");
                self.items = snapshot;
                Err(e.into())
            }
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.id() == Some(id))
    }

    /// Refetch after a mutation. On failure the patched list stays.
    async fn reconcile(&mut self) {
        match self.resource.list().await {
            Ok(items) => self.items = items,
            Err(e) => tracing::warn!(kind = T::KIND.as_str(), error = %e, "Refetch after mutation failed"),
        }
    }

    fn notify(&self) {
        if let Some(sync) = &self.notifier {
            if let Err(e) = sync.publish() {
                metrics::record_publish_failure();
                tracing::warn!(error = %e, "Change notification failed");
            }
        }
    }
}

impl CrudPanel<About> {
    /// Move the listed records to the front in the given order. Records not
    /// listed keep their relative order after them.
    ///
    /// Same flow as [`CrudPanel::submit`]: the list is reordered before the
    /// request and restored if it fails. The server's list replaces it on
    /// success.
    pub async fn reorder(&mut self, ids: &[i64]) -> Result<(), PanelError> {
        let mut problems: Vec<FieldError> = ids
            .iter()
            .enumerate()
            .filter_map(|(i, &id)| {
                let message = if self.position(id).is_none() {
                    format!("unknown id {}", id)
                } else if ids[..i].contains(&id) {
                    format!("id {} listed twice", id)
                } else {
                    return None;
                };
                Some(FieldError {
                    field: "order",
                    message,
                })
            })
            .collect();
        if !problems.is_empty() {
            problems.dedup();
            return Err(PanelError::Invalid(problems));
        }

        let order: Vec<OrderUpdate> = ids
            .iter()
            .zip(0..)
            .map(|(&id, order_index)| OrderUpdate { id, order_index })
            .collect();

        let snapshot = self.items.clone();
        let (mut moved, rest): (Vec<About>, Vec<About>) = self
            .items
            .drain(..)
            .partition(|item| item.id.is_some_and(|id| ids.contains(&id)));
        moved.sort_by_key(|item| ids.iter().position(|id| item.id == Some(*id)));
        for (item, update) in moved.iter_mut().zip(&order) {
            item.order_index = Some(update.order_index);
        }
        self.items = moved.into_iter().chain(rest).collect();

        match self.resource.reorder(&order).await {
            Ok(items) => {
                self.items = items;
                tracing::info!(kind = About::KIND.as_str(), count = order.len(), "Records reordered");
                self.notify();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind = About::KIND.as_str(), error = %e, "Reorder failed, rolling back");
                self.items = snapshot;
                Err(e.into())
            }
        }
    }
}
