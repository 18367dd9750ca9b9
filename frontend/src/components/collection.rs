//! 列表页面共用的集合组件
//!
//! `use_collection` 把核心库的 `RemoteCollection` 接入 Leptos：快照写入信号，
//! 用户操作通过 `CollectionActions` 派发到异步任务中执行。

use crate::auth::use_auth;
use crate::components::icons::{ChevronLeft, ChevronRight, RefreshCw, Search};
use crate::web::Timeout;
use admin_console::{ApiError, CollectionSnapshot, CollectionSource, RemoteCollection};
use admin_console_shared::{CollectionQuery, PAGE_SIZE_OPTIONS, SortDirection};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;

/// 搜索输入防抖时间
const SEARCH_DEBOUNCE_MS: u32 = 300;

/// 列表页面上的用户操作
#[derive(Debug, Clone)]
pub enum CollectionAction {
    Page(i64),
    Next,
    Previous,
    PageSize(u32),
    ToggleSort(String),
    Search(String),
    Refresh,
}

/// 与行类型无关的分页信息，供分页栏、搜索框等通用组件使用
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageInfo {
    pub query: CollectionQuery,
    pub total: u64,
    pub total_exact: bool,
    pub row_count: usize,
    /// 可见行的序号范围，按产生这些行的查询计算
    pub range: Option<(u64, u64)>,
    pub loading: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub error: Option<ApiError>,
}

impl PageInfo {
    fn from_snapshot<T>(snap: &CollectionSnapshot<T>) -> Self {
        Self {
            query: snap.query.clone(),
            total: snap.total(),
            total_exact: snap.last_ready.as_ref().map(|r| r.total_exact).unwrap_or(true),
            row_count: snap.rows().len(),
            range: snap.visible_range(),
            loading: snap.fetch_state.is_loading(),
            has_next: snap.has_next_page(),
            has_previous: snap.has_previous_page(),
            error: snap.fetch_state.error().cloned(),
        }
    }

    /// 形如 `21–40 of 45` 的范围文本
    pub fn range_label(&self) -> String {
        match (self.range, self.total_exact) {
            (Some((first, last)), true) => format!("{}–{} of {}", first, last, self.total),
            (Some((first, last)), false) => format!("{}–{}", first, last),
            (None, true) => format!("0 of {}", self.total),
            (None, false) => "0".to_string(),
        }
    }

    pub fn sort_direction(&self, field: &str) -> Option<SortDirection> {
        self.query
            .sort
            .as_ref()
            .filter(|s| s.field == field)
            .map(|s| s.direction)
    }
}

/// 操作派发器 (可复制，能直接放进视图闭包)
#[derive(Clone, Copy)]
pub struct CollectionActions {
    dispatch: StoredValue<Box<dyn Fn(CollectionAction)>, LocalStorage>,
}

impl CollectionActions {
    pub fn dispatch(&self, action: CollectionAction) {
        self.dispatch.with_value(|f| f(action));
    }
}

/// 列表页面持有的集合句柄
pub struct CollectionView<T: Send + Sync + 'static> {
    pub snapshot: RwSignal<CollectionSnapshot<T>>,
    pub info: Memo<PageInfo>,
    pub actions: CollectionActions,
}

impl<T: Clone + Send + Sync + 'static> CollectionView<T> {
    /// 当前显示的行 (加载或失败时沿用上一次的结果)
    pub fn rows(&self) -> Signal<Vec<T>> {
        let snapshot = self.snapshot;
        Signal::derive(move || snapshot.with(|s| s.rows().to_vec()))
    }
}

/// 创建绑定到数据源的集合，并立即加载第一页
///
/// 任意一次请求返回 401/403 时注销，路由服务随后跳回登录页。
pub fn use_collection<S>(source: S) -> CollectionView<S::Item>
where
    S: CollectionSource + 'static,
    S::Item: Send + Sync,
{
    let auth = use_auth();
    let page_size = auth.api().config().default_page_size;
    let collection = RemoteCollection::new(source, CollectionQuery::with_page_size(page_size));

    let snapshot = RwSignal::new(collection.snapshot());
    collection.subscribe(move |snap| {
        if let Some(err) = snap.fetch_state.error() {
            auth.handle_error(err);
        }
        // 页面卸载后信号已释放，忽略即可
        let _ = snapshot.try_set(snap.clone());
    });

    let info = Memo::new(move |_| snapshot.with(PageInfo::from_snapshot));

    let runner = collection.clone();
    let dispatch = move |action: CollectionAction| {
        let coll = runner.clone();
        spawn_local(async move {
            match action {
                CollectionAction::Page(index) => {
                    coll.set_page(index).await;
                }
                CollectionAction::Next => {
                    coll.next_page().await;
                }
                CollectionAction::Previous => {
                    coll.previous_page().await;
                }
                CollectionAction::PageSize(size) => {
                    if let Err(e) = coll.set_page_size(size).await {
                        log::warn!("[Collection] {}", e);
                    }
                }
                CollectionAction::ToggleSort(field) => {
                    coll.toggle_sort(&field).await;
                }
                CollectionAction::Search(term) => {
                    coll.set_search(&term).await;
                }
                CollectionAction::Refresh => {
                    coll.refresh().await;
                }
            }
        });
    };
    let actions = CollectionActions {
        dispatch: StoredValue::new_local(Box::new(dispatch) as Box<dyn Fn(CollectionAction)>),
    };

    spawn_local(async move {
        collection.load().await;
    });

    CollectionView {
        snapshot,
        info,
        actions,
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 搜索框 (输入停止 300ms 后才提交)
#[component]
pub fn SearchBar(
    actions: CollectionActions,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let pending = StoredValue::new_local(None::<Timeout>);

    view! {
        <label class="input input-bordered flex items-center gap-2 w-full max-w-xs">
            <Search attr:class="h-4 w-4 opacity-60" />
            <input
                type="search"
                class="grow"
                placeholder=placeholder
                on:input=move |ev| {
                    let term = event_target_value(&ev);
                    // 替换掉旧定时器即取消上一次尚未触发的提交
                    pending.set_value(Timeout::new(SEARCH_DEBOUNCE_MS, move || {
                        actions.dispatch(CollectionAction::Search(term));
                    }));
                }
            />
        </label>
    }
}

/// 可排序的表头
#[component]
pub fn SortHeader(
    #[prop(into)] label: String,
    field: &'static str,
    #[prop(into)] info: Signal<PageInfo>,
    actions: CollectionActions,
) -> impl IntoView {
    let indicator = move || match info.with(|i| i.sort_direction(field)) {
        Some(SortDirection::Asc) => " ▲",
        Some(SortDirection::Desc) => " ▼",
        None => "",
    };

    view! {
        <th
            class="cursor-pointer select-none"
            on:click=move |_| actions.dispatch(CollectionAction::ToggleSort(field.to_string()))
        >
            {label}
            <span class="text-xs">{indicator}</span>
        </th>
    }
}

/// 请求失败提示；保留旧数据，提供重试
#[component]
pub fn ErrorBanner(#[prop(into)] info: Signal<PageInfo>, actions: CollectionActions) -> impl IntoView {
    view! {
        <Show when=move || info.with(|i| i.error.is_some())>
            <div role="alert" class="alert alert-error my-2">
                <span>
                    "Failed to load data: "
                    {move || info.with(|i| i.error.as_ref().map(|e| e.to_string()).unwrap_or_default())}
                </span>
                <button class="btn btn-sm" on:click=move |_| actions.dispatch(CollectionAction::Refresh)>
                    <RefreshCw attr:class="h-4 w-4" />
                    "Retry"
                </button>
            </div>
        </Show>
    }
}

/// 分页栏：每页条数、范围文本与翻页按钮
#[component]
pub fn Pagination(#[prop(into)] info: Signal<PageInfo>, actions: CollectionActions) -> impl IntoView {
    view! {
        <div class="flex items-center justify-end gap-4 p-4">
            <label class="flex items-center gap-2 text-sm">
                "Rows per page:"
                <select
                    class="select select-bordered select-sm"
                    prop:value=move || info.with(|i| i.query.page_size.to_string())
                    on:change=move |ev| {
                        match event_target_value(&ev).parse::<u32>() {
                            Ok(size) => actions.dispatch(CollectionAction::PageSize(size)),
                            Err(e) => log::warn!("[Collection] Bad page size option: {}", e),
                        }
                    }
                >
                    {PAGE_SIZE_OPTIONS
                        .iter()
                        .map(|size| view! { <option value=size.to_string()>{size.to_string()}</option> })
                        .collect_view()}
                </select>
            </label>
            <span class="text-sm">{move || info.with(PageInfo::range_label)}</span>
            <div class="join">
                <button
                    class="btn btn-sm join-item"
                    title="First page"
                    disabled=move || info.with(|i| !i.has_previous || i.loading)
                    on:click=move |_| actions.dispatch(CollectionAction::Page(0))
                >
                    "«"
                </button>
                <button
                    class="btn btn-sm join-item"
                    disabled=move || info.with(|i| !i.has_previous || i.loading)
                    on:click=move |_| actions.dispatch(CollectionAction::Previous)
                >
                    <ChevronLeft attr:class="h-4 w-4" />
                </button>
                <button
                    class="btn btn-sm join-item"
                    disabled=move || info.with(|i| !i.has_next || i.loading)
                    on:click=move |_| actions.dispatch(CollectionAction::Next)
                >
                    <ChevronRight attr:class="h-4 w-4" />
                </button>
            </div>
        </div>
    }
}

/// 表格主体的空状态 / 加载状态
#[component]
pub fn EmptyRows(#[prop(into)] info: Signal<PageInfo>, colspan: u32) -> impl IntoView {
    view! {
        <Show when=move || info.with(|i| i.row_count == 0)>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">
                    {move || if info.with(|i| i.loading) {
                        view! { <span class="loading loading-spinner"></span> }.into_any()
                    } else {
                        "No records found.".into_any()
                    }}
                </td>
            </tr>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_console::CollectionController;
    use admin_console_shared::CollectionResult;

    #[test]
    fn test_range_label_uses_rows_on_screen() {
        let mut ctrl = CollectionController::<u32>::default();
        let first = ctrl.load().unwrap();
        ctrl.resolve(first.seq, Ok(CollectionResult::new(vec![1; 20], 45)));
        assert_eq!(PageInfo::from_snapshot(&ctrl.current_state()).range_label(), "1–20 of 45");

        // 第 3 页加载中，仍显示第 1 页的范围
        let third = ctrl.set_page(2).unwrap();
        let info = PageInfo::from_snapshot(&ctrl.current_state());
        assert!(info.loading);
        assert_eq!(info.range_label(), "1–20 of 45");

        ctrl.resolve(third.seq, Ok(CollectionResult::new(vec![3; 5], 45)));
        assert_eq!(PageInfo::from_snapshot(&ctrl.current_state()).range_label(), "41–45 of 45");
    }

    #[test]
    fn test_range_label_without_total() {
        let info = PageInfo {
            range: Some((21, 40)),
            total_exact: false,
            ..PageInfo::default()
        };
        assert_eq!(info.range_label(), "21–40");
        assert_eq!(PageInfo::default().range_label(), "0");
    }
}
