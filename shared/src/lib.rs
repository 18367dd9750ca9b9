use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod date;
pub mod protocol;
pub mod query;

pub use protocol::{ApiBase, Entity, HttpMethod};
pub use query::{
    CollectionQuery, CollectionResult, DEFAULT_PAGE_SIZE, ListParams, PAGE_SIZE_OPTIONS,
    SortDirection, SortSpec,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 本地持久化的认证 token 键
pub const STORAGE_TOKEN_KEY: &str = "authToken";
/// 本地持久化的管理员资料键 (JSON)
pub const STORAGE_PROFILE_KEY: &str = "userInfo";

pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// 列表接口返回总条数的响应头
pub const HEADER_TOTAL_COUNT: &str = "X-Total-Count";

// =========================================================
// 会话模型 (Session Models)
// =========================================================

/// 登录管理员的资料
///
/// 只有姓名字段是控制台直接使用的，其余字段原样保留，
/// 以便写回 LocalStorage 时不丢失信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Profile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub admin: Profile,
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 根账户 (客户)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootAccount {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub expire_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub name: String,
}

/// 根账户下的子用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub specific_address: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub root_user_id: Option<String>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// 十位电话号码格式化为 `(xxx) xxx-xxxx`，其余原样返回
    pub fn formatted_phone(&self) -> String {
        let phone = self.phone_number.clone().unwrap_or_default();
        match phone.get(..10) {
            Some(head) if head.chars().all(|c| c.is_ascii_digit()) => format!(
                "({}) {}-{}{}",
                &head[..3],
                &head[3..6],
                &head[6..],
                &phone[10..]
            ),
            _ => phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedDocument {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub mimetype: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub upload_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(rename = "TINNumber", default)]
    pub tin_number: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub uploaded_document: Option<UploadedDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTransaction {
    pub transaction_id: String,
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub subscription_total: f64,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub root_user_id: String,
    #[serde(default)]
    pub orders: Vec<String>,
    #[serde(default)]
    pub transactions: Vec<SubscriptionTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub image_id: String,
    #[serde(rename = "vCPU", default)]
    pub vcpu: u32,
    #[serde(rename = "RAM", default)]
    pub ram: u32,
    #[serde(default)]
    pub disk_size: u32,
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrderPayload {
    #[serde(default)]
    pub vm: Vec<VirtualMachine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub order_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub order: Option<OrderPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodInfo {
    #[serde(rename = "paymentURL", default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub payment_body: Option<PaymentBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub payment_method_info: Option<PaymentMethodInfo>,
}

impl Transaction {
    /// 支付关联的订单 ID (若有)
    pub fn order_id(&self) -> Option<&str> {
        self.payment_method_info
            .as_ref()?
            .payment_body
            .as_ref()?
            .order_id
            .as_deref()
    }
}

// =========================================================
// 汇率 (Exchange Rate)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRateRequest {
    pub exchange_rate: f64,
}

/// 汇率值：服务端既可能返回字符串也可能返回数字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateValue {
    Number(f64),
    Text(String),
}

impl RateValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RateValue::Number(v) => Some(*v),
            RateValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub value: RateValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRateResponse {
    pub exchange_rate: RateRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let raw = r#"{"firstName":"Abebe","lastName":"Kebede","role":"super"}"#;
        let profile: Profile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.display_name(), "Abebe Kebede");
        assert_eq!(profile.extra.get("role"), Some(&serde_json::json!("super")));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["role"], "super");
        assert_eq!(back["firstName"], "Abebe");
    }

    #[test]
    fn test_root_account_wire_names() {
        let raw = r#"{"_id":"r1","accountName":"Acme","active":true,"expireDate":"2025-01-31T00:00:00Z"}"#;
        let account: RootAccount = serde_json::from_str(raw).unwrap();
        assert_eq!(account.id, "r1");
        assert!(account.active);
        assert!(account.expire_date.is_some());
        assert!(account.closed_date.is_none());
    }

    #[test]
    fn test_formatted_phone() {
        let mut user: User = serde_json::from_str(r#"{"_id":"u1","phoneNumber":"0911223344"}"#).unwrap();
        assert_eq!(user.formatted_phone(), "(091) 122-3344");
        user.phone_number = Some("+251".into());
        assert_eq!(user.formatted_phone(), "+251");
    }

    #[test]
    fn test_rate_value_accepts_text_and_number() {
        let text: RateRecord = serde_json::from_str(r#"{"value":"56.75"}"#).unwrap();
        let number: RateRecord = serde_json::from_str(r#"{"value":56.75}"#).unwrap();
        assert_eq!(text.value.as_f64(), Some(56.75));
        assert_eq!(number.value.as_f64(), Some(56.75));
    }

    #[test]
    fn test_transaction_order_id() {
        let raw = r#"{"_id":"t1","paymentMethodInfo":{"paymentURL":"https://pay","paymentBody":{"orderId":"o9"}}}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.order_id(), Some("o9"));
    }
}
