// Editorial content services: news, products, careers
//
// The three resources differ only in path, payload types and wording, so
// one generic service covers them.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use estate_api::models::{Career, CareerDraft, NewsArticle, NewsDraft, Product, ProductDraft};
use estate_api::{ApiClient, Listing};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Collection, Identified, ack, fetch_list, payload};
use crate::error::CoreError;
use crate::filter::{CareerFilter, ListFilter, ListQuery, NewsFilter, ProductFilter};

/// Static description of one CRUD resource under `/admin`.
pub trait Resource: Send + Sync + 'static {
    const PATH: &'static str;
    /// Vietnamese noun used in fallback messages.
    const NOUN: &'static str;
    type Item: Identified + DeserializeOwned + Clone + Send + Sync + 'static;
    type Draft: Serialize + Send + Sync + 'static;
    type Filter: ListFilter;
}

pub struct News;
pub struct Products;
pub struct Careers;

impl Resource for News {
    const PATH: &'static str = "/admin/news";
    const NOUN: &'static str = "tin tức";
    type Item = NewsArticle;
    type Draft = NewsDraft;
    type Filter = NewsFilter;
}

impl Resource for Products {
    const PATH: &'static str = "/admin/products";
    const NOUN: &'static str = "sản phẩm";
    type Item = Product;
    type Draft = ProductDraft;
    type Filter = ProductFilter;
}

impl Resource for Careers {
    const PATH: &'static str = "/admin/careers";
    const NOUN: &'static str = "tin tuyển dụng";
    type Item = Career;
    type Draft = CareerDraft;
    type Filter = CareerFilter;
}

pub type NewsService = ResourceService<News>;
pub type ProductService = ResourceService<Products>;
pub type CareerService = ResourceService<Careers>;

pub struct ResourceService<R> {
    client: Arc<ApiClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{id}", R::PATH)
    }

    pub async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Listing<R::Item>, CoreError> {
        let fallback = format!("Không thể tải danh sách {}", R::NOUN);
        fetch_list(&self.client, R::PATH, query, &fallback).await
    }

    pub async fn get(&self, id: &str) -> Result<R::Item, CoreError> {
        let result = self.client.get(&Self::item_path(id)).await;
        payload(result, &format!("Không thể tải {}", R::NOUN))
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<R::Item, CoreError> {
        let result = self.client.post(R::PATH, draft).await;
        payload(result, &format!("Không thể tạo {}", R::NOUN))
    }

    pub async fn update(&self, id: &str, draft: &R::Draft) -> Result<R::Item, CoreError> {
        let result = self.client.put(&Self::item_path(id), draft).await;
        payload(result, &format!("Không thể cập nhật {}", R::NOUN))
    }

    pub async fn delete(&self, id: &str) -> Result<(), CoreError> {
        let result = self.client.delete::<Value>(&Self::item_path(id)).await;
        ack(result, &format!("Không thể xóa {}", R::NOUN)).map(|_| ())
    }
}

#[async_trait]
impl<R: Resource> Collection for ResourceService<R> {
    type Item = R::Item;
    type Draft = R::Draft;
    type Patch = R::Draft;
    type Filter = R::Filter;

    async fn list(&self, query: &ListQuery<R::Filter>) -> Result<Listing<R::Item>, CoreError> {
        ResourceService::list(self, query).await
    }

    async fn create(&self, draft: R::Draft) -> Result<R::Item, CoreError> {
        ResourceService::create(self, &draft).await
    }

    async fn update(&self, id: &str, draft: R::Draft) -> Result<R::Item, CoreError> {
        ResourceService::update(self, id, &draft).await
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        ResourceService::delete(self, id).await
    }
}
