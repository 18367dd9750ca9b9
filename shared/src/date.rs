//! 时间显示辅助
//!
//! 列表和详情页面统一的日期文本：有值显示 `YYYY-MM-DD`，缺失显示 `N/A`。

use chrono::{DateTime, Utc};

pub const MISSING_DATE: &str = "N/A";

/// 格式化为日期 (不含时间)
pub fn format_date(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => MISSING_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(format_date(Some(&ts)), "2024-03-09");
        assert_eq!(format_date(None), "N/A");
    }
}
