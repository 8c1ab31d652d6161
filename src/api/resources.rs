//! Typed CRUD access to content collections.

use std::marker::PhantomData;

use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::error::{ApiError, ApiResult};
use crate::content::{About, ContentItem, Enquiry, OrderUpdate, Project};

const CONTACT_FORM_PATH: &str = "/api/contact";
const ABOUT_ORDER_PATH: &str = "/api/about/order";

/// CRUD calls for one content type.
#[derive(Debug, Clone)]
pub struct ResourceApi<T> {
    api: ApiClient,
    _item: PhantomData<fn() -> T>,
}

impl<T: ContentItem> ResourceApi<T> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _item: PhantomData,
        }
    }

    /// List the collection. A single-object response (e.g. hero) becomes a
    /// one-element list; `null` becomes an empty one.
    pub async fn list(&self) -> ApiResult<Vec<T>> {
        let value: Value = self.api.get(T::KIND.collection_path()).await?;
        decode_list(value)
    }

    pub async fn create(&self, item: &T) -> ApiResult<T> {
        self.api.post(T::KIND.collection_path(), item).await
    }

    pub async fn update(&self, id: i64, item: &T) -> ApiResult<T> {
        self.api.put(&T::KIND.member_path(id), item).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.api.delete(&T::KIND.member_path(id)).await?;
        Ok(())
    }

    /// Create when `item` has no id, update otherwise.
    pub async fn upsert(&self, item: &T) -> ApiResult<T> {
        match item.id() {
            Some(id) => self.update(id, item).await,
            None => self.create(item).await,
        }
    }
}

impl ResourceApi<About> {
    /// Store new positions; returns the whole list in its new order.
    pub async fn reorder(&self, order: &[OrderUpdate]) -> ApiResult<Vec<About>> {
        let value: Value = self.api.put(ABOUT_ORDER_PATH, order).await?;
        decode_list(value)
    }
}

impl ResourceApi<Project> {
    /// Active projects in one category.
    pub async fn list_category(&self, category: &str) -> ApiResult<Vec<Project>> {
        let path = format!("{}/{}", Project::KIND.collection_path(), category);
        let value: Value = self.api.get(&path).await?;
        decode_list(value)
    }
}

impl ApiClient {
    /// Public contact-form submission.
    pub async fn submit_enquiry(&self, enquiry: &Enquiry) -> ApiResult<Enquiry> {
        self.post(CONTACT_FORM_PATH, enquiry).await
    }
}

/// A single-object response (e.g. hero) becomes a one-element list; `null`
/// becomes an empty one.
fn decode_list<T: ContentItem>(value: Value) -> ApiResult<Vec<T>> {
    let items = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(ApiError::Decode(format!(
                "expected a list of {}, got {}",
                T::KIND,
                other
            )))
        }
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string())))
        .collect()
}
