//! 集合查询模型
//!
//! 列表页面共用的分页 / 排序 / 搜索查询，以及它与列表接口参数之间的换算。
//! 内部模型使用从 0 开始的页码，接口参数使用从 1 开始的页码。

use serde::{Deserialize, Serialize};

/// 允许的每页条数
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub fn is_supported_page_size(size: u32) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

// =========================================================
// 排序 (Sorting)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// 单列排序。同一时间只允许一个排序列。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

// =========================================================
// 查询 (Collection Query)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionQuery {
    pub page_index: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    pub search_term: String,
}

impl Default for CollectionQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            search_term: String::new(),
        }
    }
}

impl CollectionQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// 转换为接口参数 (页码 +1)
    pub fn to_params(&self) -> ListParams {
        ListParams {
            page: self.page_index.saturating_add(1),
            limit: self.page_size,
            sort: self.sort.as_ref().map(|s| s.field.clone()),
            order: self.sort.as_ref().map(|s| s.direction),
            search: self.search_term.clone(),
        }
    }

    /// 从接口参数还原查询 (页码 -1，页码 0 视为第一页)
    pub fn from_params(params: &ListParams) -> Self {
        let sort = params.sort.as_ref().map(|field| SortSpec {
            field: field.clone(),
            direction: params.order.unwrap_or_default(),
        });
        Self {
            page_index: params.page.saturating_sub(1),
            page_size: params.limit,
            sort,
            search_term: params.search.clone(),
        }
    }

    /// 当前页第一行的序号 (从 1 开始)
    pub fn first_row(&self) -> u64 {
        self.page_index as u64 * self.page_size as u64 + 1
    }

    /// 当前页最后一行的序号，不超过总数
    pub fn last_row(&self, total: u64) -> u64 {
        total.min(self.first_row() + self.page_size as u64 - 1)
    }
}

/// 列表接口的查询参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(rename = "_page")]
    pub page: u32,
    #[serde(rename = "_limit")]
    pub limit: u32,
    #[serde(rename = "_sort", default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(rename = "_order", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortDirection>,
    #[serde(rename = "q", default)]
    pub search: String,
}

impl ListParams {
    /// 未指定排序时填入实体的默认排序列 (升序)
    pub fn with_default_sort(mut self, field: Option<&str>) -> Self {
        if self.sort.is_none() {
            if let Some(field) = field {
                self.sort = Some(field.to_string());
                self.order = Some(SortDirection::Asc);
            }
        }
        self
    }
}

// =========================================================
// 结果 (Collection Result)
// =========================================================

/// 一页数据加上匹配总数
///
/// `total_exact == false` 表示服务端没有给出总数，`total` 只是本页条数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_exact: bool,
}

impl<T> Default for CollectionResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_exact: true,
        }
    }
}

impl<T> CollectionResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self {
            items,
            total,
            total_exact: true,
        }
    }

    /// 没有总数信号时的降级结果
    pub fn without_total(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            total,
            total_exact: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 是否可能存在下一页
    ///
    /// 总数精确时按总数判断；不精确时，只要本页是满的就认为可能还有下一页。
    pub fn has_next_page(&self, query: &CollectionQuery) -> bool {
        if self.total_exact {
            query.last_row(self.total) < self.total
        } else {
            self.items.len() as u64 >= query.page_size as u64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let q = CollectionQuery::default();
        assert_eq!(q.page_index, 0);
        assert_eq!(q.page_size, 20);
        assert!(q.sort.is_none());
        assert!(q.search_term.is_empty());
    }

    #[test]
    fn test_params_are_one_based() {
        let q = CollectionQuery {
            page_index: 2,
            page_size: 50,
            sort: Some(SortSpec::desc("total")),
            search_term: " acme ".into(),
        };
        let params = q.to_params();
        assert_eq!(params.page, 3);
        assert_eq!(params.limit, 50);
        assert_eq!(params.sort.as_deref(), Some("total"));
        assert_eq!(params.order, Some(SortDirection::Desc));
        assert_eq!(params.search, " acme ");
        assert_eq!(CollectionQuery::from_params(&params), q);
    }

    #[test]
    fn test_default_sort_only_fills_missing() {
        let params = CollectionQuery::default().to_params().with_default_sort(Some("id"));
        assert_eq!(params.sort.as_deref(), Some("id"));
        assert_eq!(params.order, Some(SortDirection::Asc));

        let q = CollectionQuery {
            sort: Some(SortSpec::desc("status")),
            ..CollectionQuery::default()
        };
        let params = q.to_params().with_default_sort(Some("id"));
        assert_eq!(params.sort.as_deref(), Some("status"));

        let params = CollectionQuery::default().to_params().with_default_sort(None);
        assert!(params.sort.is_none());
        assert!(params.order.is_none());
    }

    #[test]
    fn test_row_range() {
        let q = CollectionQuery {
            page_index: 2,
            ..CollectionQuery::default()
        };
        assert_eq!(q.first_row(), 41);
        assert_eq!(q.last_row(45), 45);
        assert_eq!(CollectionQuery::default().last_row(45), 20);
    }

    #[test]
    fn test_has_next_page() {
        let q = CollectionQuery::default();
        let exact = CollectionResult::new(vec![0; 20], 45);
        assert!(exact.has_next_page(&q));

        let last = CollectionQuery {
            page_index: 2,
            ..CollectionQuery::default()
        };
        assert!(!CollectionResult::new(vec![0; 5], 45).has_next_page(&last));

        // 没有总数时只能依据本页是否已满来推断
        assert!(CollectionResult::without_total(vec![0; 20]).has_next_page(&q));
        assert!(!CollectionResult::without_total(vec![0; 7]).has_next_page(&q));
    }

    #[test]
    fn test_supported_page_sizes() {
        for size in PAGE_SIZE_OPTIONS {
            assert!(is_supported_page_size(size));
        }
        assert!(!is_supported_page_size(0));
        assert!(!is_supported_page_size(25));
    }
}
