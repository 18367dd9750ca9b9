//! 远程集合控制器
//!
//! 列表页面的分页 / 排序 / 搜索状态机。
//!
//! - `CollectionController` 是纯同步的状态机：每个修改操作返回一个 `FetchTicket`
//!   (需要发起请求时)，请求结束后通过 `resolve` 提交结果。
//! - 每张票据带有递增的序号，只有最新序号的结果会被提交，迟到的旧响应直接丢弃。
//! - `RemoteCollection` 把控制器和数据源绑在一起，负责执行票据并通知订阅者。

use crate::error::{ApiError, ApiResult};
use crate::source::CollectionSource;
use admin_console_shared::query::is_supported_page_size;
use admin_console_shared::{CollectionQuery, CollectionResult, SortDirection, SortSpec};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unsupported page size {0}, expected one of 10, 20, 50, 100")]
    UnsupportedPageSize(u32),
}

// =========================================================
// 状态 (Fetch State & Snapshot)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(CollectionResult<T>),
    Failed(ApiError),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            FetchState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// 渲染层读取的一致快照
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot<T> {
    pub query: CollectionQuery,
    pub fetch_state: FetchState<T>,
    /// 最近一次成功的结果；失败或加载期间仍然可用
    pub last_ready: Option<CollectionResult<T>>,
    /// 产生 `last_ready` 的查询
    pub ready_query: Option<CollectionQuery>,
}

impl<T> CollectionSnapshot<T> {
    /// 当前应显示的行：加载或失败时沿用上一次的结果
    pub fn rows(&self) -> &[T] {
        match &self.fetch_state {
            FetchState::Ready(result) => &result.items,
            _ => self
                .last_ready
                .as_ref()
                .map(|r| r.items.as_slice())
                .unwrap_or_default(),
        }
    }

    pub fn total(&self) -> u64 {
        self.visible_result().map(|r| r.total).unwrap_or(0)
    }

    /// 只有可见结果正是当前查询的结果时才能判断下一页
    pub fn has_next_page(&self) -> bool {
        match (self.visible_result(), &self.ready_query) {
            (Some(result), Some(shown)) if *shown == self.query => result.has_next_page(shown),
            _ => false,
        }
    }

    /// 可见行在整个结果集中的序号范围 (从 1 开始)
    ///
    /// 按产生这些行的查询计算，加载新查询期间仍与旧行一致。
    pub fn visible_range(&self) -> Option<(u64, u64)> {
        let shown = self.ready_query.as_ref()?;
        let count = self.rows().len() as u64;
        if count == 0 {
            return None;
        }
        let first = shown.first_row();
        Some((first, first + count - 1))
    }

    pub fn has_previous_page(&self) -> bool {
        self.query.page_index > 0
    }

    fn visible_result(&self) -> Option<&CollectionResult<T>> {
        match &self.fetch_state {
            FetchState::Ready(result) => Some(result),
            _ => self.last_ready.as_ref(),
        }
    }
}

/// 一次需要执行的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: CollectionQuery,
}

/// 结果提交的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 结果属于最新请求，已提交
    Applied,
    /// 已有更新的请求，结果被丢弃
    Discarded,
}

// =========================================================
// 控制器 (Controller)
// =========================================================

#[derive(Debug, Clone)]
pub struct CollectionController<T> {
    query: CollectionQuery,
    state: FetchState<T>,
    last_ready: Option<CollectionResult<T>>,
    ready_query: Option<CollectionQuery>,
    /// 最近一次发出的请求序号，0 表示尚未发出
    latest_seq: u64,
}

impl<T: Clone> Default for CollectionController<T> {
    fn default() -> Self {
        Self::new(CollectionQuery::default())
    }
}

impl<T: Clone> CollectionController<T> {
    pub fn new(query: CollectionQuery) -> Self {
        Self {
            query,
            state: FetchState::Idle,
            last_ready: None,
            ready_query: None,
            latest_seq: 0,
        }
    }

    pub fn with_page_size(page_size: u32) -> Result<Self, QueryError> {
        if !is_supported_page_size(page_size) {
            return Err(QueryError::UnsupportedPageSize(page_size));
        }
        Ok(Self::new(CollectionQuery::with_page_size(page_size)))
    }

    pub fn query(&self) -> &CollectionQuery {
        &self.query
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn last_ready(&self) -> Option<&CollectionResult<T>> {
        self.last_ready.as_ref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn current_state(&self) -> CollectionSnapshot<T> {
        CollectionSnapshot {
            query: self.query.clone(),
            fetch_state: self.state.clone(),
            last_ready: self.last_ready.clone(),
            ready_query: self.ready_query.clone(),
        }
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.state = FetchState::Loading;
        log::debug!(
            "[Collection] #{} page={} size={} sort={:?} q={:?}",
            self.latest_seq,
            self.query.page_index,
            self.query.page_size,
            self.query.sort,
            self.query.search_term
        );
        FetchTicket {
            seq: self.latest_seq,
            query: self.query.clone(),
        }
    }

    /// 提交新查询；与当前查询相同则不发请求
    fn apply(&mut self, next: CollectionQuery) -> Option<FetchTicket> {
        if next == self.query {
            return None;
        }
        self.query = next;
        Some(self.issue())
    }

    /// 首次加载 (页面挂载时)
    ///
    /// 已经发出过请求时返回 `None`，重新加载请用 `refresh`。
    pub fn load(&mut self) -> Option<FetchTicket> {
        if self.latest_seq > 0 {
            return None;
        }
        Some(self.issue())
    }

    /// 重新请求当前查询
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// 跳转到指定页，负数视为第一页；其他字段保持不变
    pub fn set_page(&mut self, index: i64) -> Option<FetchTicket> {
        let page_index = index.clamp(0, u32::MAX as i64) as u32;
        self.apply(CollectionQuery {
            page_index,
            ..self.query.clone()
        })
    }

    /// 下一页；当前查询的结果尚未到达或已知没有更多数据时不动
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.current_state().has_next_page() {
            return None;
        }
        self.set_page(self.query.page_index as i64 + 1)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        if self.query.page_index == 0 {
            return None;
        }
        self.set_page(self.query.page_index as i64 - 1)
    }

    /// 修改每页条数并回到第一页
    pub fn set_page_size(&mut self, page_size: u32) -> Result<Option<FetchTicket>, QueryError> {
        if !is_supported_page_size(page_size) {
            log::warn!("[Collection] Rejected page size {}", page_size);
            return Err(QueryError::UnsupportedPageSize(page_size));
        }
        Ok(self.apply(CollectionQuery {
            page_index: 0,
            page_size,
            ..self.query.clone()
        }))
    }

    /// 设置 (或清除) 排序列并回到第一页
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Option<FetchTicket> {
        self.apply(CollectionQuery {
            page_index: 0,
            sort,
            ..self.query.clone()
        })
    }

    /// 点击列头：升序 -> 降序 -> 不排序
    pub fn toggle_sort(&mut self, field: &str) -> Option<FetchTicket> {
        let next = match &self.query.sort {
            Some(current) if current.field == field => match current.direction {
                SortDirection::Asc => Some(SortSpec::desc(field)),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec::asc(field)),
        };
        self.set_sort(next)
    }

    /// 设置搜索词 (原样保存，不做 trim) 并回到第一页
    pub fn set_search(&mut self, term: &str) -> Option<FetchTicket> {
        self.apply(CollectionQuery {
            page_index: 0,
            search_term: term.to_string(),
            ..self.query.clone()
        })
    }

    /// 提交请求结果
    ///
    /// 只接受最新序号的结果。超出 `page_size` 的条目会被截断。
    pub fn resolve(&mut self, seq: u64, outcome: ApiResult<CollectionResult<T>>) -> Resolution {
        if seq != self.latest_seq {
            log::debug!(
                "[Collection] Discarding stale response #{} (latest #{})",
                seq,
                self.latest_seq
            );
            return Resolution::Discarded;
        }

        match outcome {
            Ok(mut result) => {
                let limit = self.query.page_size as usize;
                if result.items.len() > limit {
                    log::warn!(
                        "[Collection] Server returned {} rows for page size {}, truncating",
                        result.items.len(),
                        limit
                    );
                    result.items.truncate(limit);
                }
                self.last_ready = Some(result.clone());
                self.ready_query = Some(self.query.clone());
                self.state = FetchState::Ready(result);
            }
            Err(e) => {
                log::warn!("[Collection] Fetch #{} failed: {}", seq, e);
                self.state = FetchState::Failed(e);
            }
        }
        Resolution::Applied
    }
}

// =========================================================
// 驱动器 (Async Driver)
// =========================================================

type Listener<T> = Box<dyn Fn(&CollectionSnapshot<T>)>;

/// 绑定数据源的集合
///
/// 所有状态都在单线程内共享 (`Rc<RefCell<..>>`)，借用不会跨越 await。
pub struct RemoteCollection<S: CollectionSource> {
    source: Rc<S>,
    controller: Rc<RefCell<CollectionController<S::Item>>>,
    listeners: Rc<RefCell<Vec<Listener<S::Item>>>>,
}

impl<S: CollectionSource> Clone for RemoteCollection<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            controller: self.controller.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl<S: CollectionSource> RemoteCollection<S> {
    pub fn new(source: S, query: CollectionQuery) -> Self {
        Self {
            source: Rc::new(source),
            controller: Rc::new(RefCell::new(CollectionController::new(query))),
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> CollectionSnapshot<S::Item> {
        self.controller.borrow().current_state()
    }

    /// 注册状态变化回调；回调内不要再调用 `subscribe`
    pub fn subscribe(&self, listener: impl Fn(&CollectionSnapshot<S::Item>) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }

    /// 执行票据并提交结果
    async fn run(&self, ticket: Option<FetchTicket>) -> Option<Resolution> {
        let ticket = ticket?;
        self.notify();

        let outcome = self.source.fetch(&ticket.query).await;
        let resolution = self.controller.borrow_mut().resolve(ticket.seq, outcome);
        if resolution == Resolution::Applied {
            self.notify();
        }
        Some(resolution)
    }

    pub async fn load(&self) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().load();
        self.run(ticket).await
    }

    pub async fn refresh(&self) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().refresh();
        self.run(Some(ticket)).await
    }

    pub async fn set_page(&self, index: i64) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().set_page(index);
        self.run(ticket).await
    }

    pub async fn next_page(&self) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().next_page();
        self.run(ticket).await
    }

    pub async fn previous_page(&self) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().previous_page();
        self.run(ticket).await
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<Option<Resolution>, QueryError> {
        let ticket = self.controller.borrow_mut().set_page_size(page_size)?;
        Ok(self.run(ticket).await)
    }

    pub async fn set_sort(&self, sort: Option<SortSpec>) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().set_sort(sort);
        self.run(ticket).await
    }

    pub async fn toggle_sort(&self, field: &str) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().toggle_sort(field);
        self.run(ticket).await
    }

    pub async fn set_search(&self, term: &str) -> Option<Resolution> {
        let ticket = self.controller.borrow_mut().set_search(term);
        self.run(ticket).await
    }
}
