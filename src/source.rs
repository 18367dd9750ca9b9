//! 集合数据源
//!
//! 集合控制器只认识 `CollectionSource`：给一个查询，返回一页结果。
//! 每种实体的列表接口通过 `EntityList` 接入，临时数据源可以用 `FnSource` 包一个闭包。

use crate::api::ConsoleApi;
use crate::error::ApiResult;
use crate::request::HttpClient;
use crate::session::CredentialStore;
use admin_console_shared::{
    CollectionQuery, CollectionResult, Company, Entity, Order, RootAccount, Subscription,
    Transaction, User,
};
use futures::future::LocalBoxFuture;
use std::marker::PhantomData;

/// 分页数据源
#[async_trait::async_trait(?Send)]
pub trait CollectionSource {
    type Item: Clone + 'static;

    async fn fetch(&self, query: &CollectionQuery) -> ApiResult<CollectionResult<Self::Item>>;
}

// =========================================================
// 实体列表 (Entity List Adapter)
// =========================================================

/// 绑定到某个实体列表接口的数据源
pub struct EntityList<E, C: HttpClient, S: CredentialStore> {
    api: ConsoleApi<C, S>,
    scope: Vec<(String, String)>,
    _entity: PhantomData<E>,
}

impl<E: Entity, C: HttpClient, S: CredentialStore> EntityList<E, C, S> {
    pub fn new(api: ConsoleApi<C, S>) -> Self {
        Self {
            api,
            scope: Vec::new(),
            _entity: PhantomData,
        }
    }

    /// 附加一个过滤参数，每次请求都会带上
    pub fn scoped(mut self, key: &str, value: &str) -> Self {
        self.scope.push((key.to_string(), value.to_string()));
        self
    }

    pub fn scope(&self) -> &[(String, String)] {
        &self.scope
    }
}

#[async_trait::async_trait(?Send)]
impl<E: Entity, C: HttpClient, S: CredentialStore> CollectionSource for EntityList<E, C, S> {
    type Item = E;

    async fn fetch(&self, query: &CollectionQuery) -> ApiResult<CollectionResult<E>> {
        self.api.list::<E>(query, &self.scope).await
    }
}

/// 各列表页面使用的数据源
impl<C: HttpClient, S: CredentialStore> ConsoleApi<C, S> {
    pub fn customers(&self) -> EntityList<RootAccount, C, S> {
        EntityList::new(self.clone())
    }

    /// 某个根账户下的子用户
    pub fn users(&self, root_user_id: &str) -> EntityList<User, C, S> {
        EntityList::new(self.clone()).scoped("rootUserId", root_user_id)
    }

    pub fn companies(&self) -> EntityList<Company, C, S> {
        EntityList::new(self.clone())
    }

    pub fn subscriptions(&self) -> EntityList<Subscription, C, S> {
        EntityList::new(self.clone())
    }

    pub fn transactions(&self) -> EntityList<Transaction, C, S> {
        EntityList::new(self.clone())
    }

    pub fn orders(&self) -> EntityList<Order, C, S> {
        EntityList::new(self.clone())
    }
}

// =========================================================
// 闭包数据源 (Closure Adapter)
// =========================================================

type FetchFn<T> = dyn Fn(CollectionQuery) -> LocalBoxFuture<'static, ApiResult<CollectionResult<T>>>;

/// 用闭包实现的数据源
pub struct FnSource<T> {
    fetch: Box<FetchFn<T>>,
}

impl<T> FnSource<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(CollectionQuery) -> LocalBoxFuture<'static, ApiResult<CollectionResult<T>>> + 'static,
    {
        Self { fetch: Box::new(f) }
    }
}

#[async_trait::async_trait(?Send)]
impl<T: Clone + 'static> CollectionSource for FnSource<T> {
    type Item = T;

    async fn fetch(&self, query: &CollectionQuery) -> ApiResult<CollectionResult<T>> {
        (self.fetch)(query.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use futures::FutureExt;

    #[tokio::test]
    async fn test_fn_source_receives_query() {
        let source = FnSource::new(|q: CollectionQuery| {
            async move {
                if q.search_term == "boom" {
                    return Err(ApiError::Transport("offline".into()));
                }
                Ok(CollectionResult::new(vec![q.page_index], 1))
            }
            .boxed_local()
        });

        let page = source
            .fetch(&CollectionQuery {
                page_index: 3,
                ..CollectionQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items, vec![3]);

        let err = source
            .fetch(&CollectionQuery {
                search_term: "boom".into(),
                ..CollectionQuery::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Transport("offline".into()));
    }
}
