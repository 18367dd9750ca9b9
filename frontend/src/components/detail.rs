//! 各实体的详情页面

use crate::auth::{AuthContext, use_auth};
use crate::components::layout::Layout;
use crate::web::router::{Link, use_router};
use admin_console::{AppRoute, ApiError};
use admin_console_shared::date::{MISSING_DATE, format_date};
use admin_console_shared::{
    Company, Entity, Order, RootAccount, Subscription, Transaction, User,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 单个实体的加载状态
#[derive(Debug, Clone, PartialEq)]
enum Loadable<E> {
    Loading,
    Loaded(E),
    Failed(ApiError),
}

/// 按 ID 加载实体；失败时交给认证上下文统一处理 401
fn use_entity<E>(id: &str) -> RwSignal<Loadable<E>>
where
    E: Entity + Send + Sync,
{
    let auth = use_auth();
    let state = RwSignal::new(Loadable::Loading);
    let id = id.to_string();

    spawn_local(async move {
        let next = match auth.api().get::<E>(&id).await {
            Ok(entity) => Loadable::Loaded(entity),
            Err(e) => {
                log::warn!("[Detail] Failed to load {} {}: {}", E::NAME, id, e);
                auth.handle_error(&e);
                Loadable::Failed(e)
            }
        };
        let _ = state.try_set(next);
    });

    state
}

fn render_loadable<E>(
    state: RwSignal<Loadable<E>>,
    render: impl Fn(E) -> AnyView + Send + Sync + 'static,
) -> impl IntoView
where
    E: Clone + Send + Sync + 'static,
{
    move || match state.get() {
        Loadable::Loading => view! {
            <div class="flex justify-center py-16">
                <span class="loading loading-spinner loading-lg"></span>
            </div>
        }
        .into_any(),
        Loadable::Failed(err) => view! {
            <div role="alert" class="alert alert-error">
                <span>{err.to_string()}</span>
            </div>
        }
        .into_any(),
        Loadable::Loaded(entity) => render(entity).into_any(),
    }
}

/// 详情卡片外框，底部带返回按钮
#[component]
fn DetailCard(#[prop(into)] heading: String, children: Children) -> impl IntoView {
    let router = use_router();

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-1">
                <h3 class="card-title text-xl">{heading}</h3>
                {children()}
                <div class="card-actions justify-end mt-4">
                    <button class="btn btn-outline btn-sm" on:click=move |_| router.back()>
                        "Back"
                    </button>
                </div>
            </div>
        </div>
    }
}

fn field(label: &'static str, value: String) -> impl IntoView {
    view! {
        <p>
            <span class="font-semibold">{label}": "</span>
            {value}
        </p>
    }
}

fn text_or_missing(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => MISSING_DATE.to_string(),
    }
}

/// 服务端自由格式的 JSON 字段 (时长、交易 ID 等)
fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// 激活状态切换
// ============================================================================

/// 激活 / 停用按钮的共享状态
#[derive(Clone, Copy)]
struct ActivationControl {
    busy: RwSignal<bool>,
    error: RwSignal<Option<String>>,
}

impl ActivationControl {
    fn new() -> Self {
        Self {
            busy: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    /// 提交切换；成功后由 `on_done` 更新已加载的实体
    fn submit<F>(
        self,
        auth: AuthContext,
        target: bool,
        request: impl std::future::Future<Output = Result<(), ApiError>> + 'static,
        on_done: F,
    ) where
        F: FnOnce(bool) + 'static,
    {
        if self.busy.get_untracked() {
            return;
        }
        self.busy.set(true);
        self.error.set(None);
        spawn_local(async move {
            match request.await {
                Ok(()) => on_done(target),
                Err(e) => {
                    auth.handle_error(&e);
                    let _ = self.error.try_set(Some(e.message().to_string()));
                }
            }
            let _ = self.busy.try_set(false);
        });
    }

    fn view(self, active: bool, on_click: impl Fn() + Send + Sync + 'static) -> impl IntoView {
        let (label, class) = if active {
            ("Deactivate", "btn btn-error btn-sm")
        } else {
            ("Activate", "btn btn-success btn-sm")
        };

        view! {
            <div class="flex items-center gap-3 mb-2">
                <button class=class disabled=move || self.busy.get() on:click=move |_| on_click()>
                    {label}
                </button>
                <Show when=move || self.error.get().is_some()>
                    <span class="text-error text-sm">{move || self.error.get().unwrap_or_default()}</span>
                </Show>
            </div>
        }
    }
}

// ============================================================================
// 页面
// ============================================================================

#[component]
pub fn CustomerDetailPage(id: String) -> impl IntoView {
    let auth = use_auth();
    let state = use_entity::<RootAccount>(&id);
    let control = ActivationControl::new();

    let body = render_loadable(state, move |account: RootAccount| {
        let active = account.active;
        let account_id = account.id.clone();
        let toggle = move || {
            let target = !active;
            let api = auth.api();
            let id = account_id.clone();
            control.submit(
                auth,
                target,
                async move { api.set_root_account_active(&id, target).await },
                move |active| {
                    state.update(|s| {
                        if let Loadable::Loaded(a) = s {
                            a.active = active;
                        }
                    })
                },
            );
        };

        view! {
            <DetailCard heading=format!("Account Name: {}", account.account_name)>
                {control.view(active, toggle)}
                {field("Status", if active { "Active" } else { "Inactive" }.to_string())}
                {field("Expire Date", format_date(account.expire_date.as_ref()))}
                {field("Closed Date", format_date(account.closed_date.as_ref()))}
                <div class="mt-2">
                    <Link to=AppRoute::Users(account.id.clone()) class="btn btn-sm btn-outline">
                        "Display Users"
                    </Link>
                </div>
            </DetailCard>
        }
        .into_any()
    });

    view! { <Layout title="Customer Detail">{body}</Layout> }
}

#[component]
pub fn UserDetailPage(id: String) -> impl IntoView {
    let auth = use_auth();
    let state = use_entity::<User>(&id);
    let control = ActivationControl::new();

    let body = render_loadable(state, move |user: User| {
        let active = user.is_active.unwrap_or(false);
        let user_id = user.id.clone();
        let toggle = move || {
            let target = !active;
            let api = auth.api();
            let id = user_id.clone();
            control.submit(
                auth,
                target,
                async move { api.set_user_active(&id, target).await },
                move |active| {
                    state.update(|s| {
                        if let Loadable::Loaded(u) = s {
                            u.is_active = Some(active);
                        }
                    })
                },
            );
        };

        let full_name = [
            Some(user.first_name.as_str()),
            user.middle_name.as_deref(),
            Some(user.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let root = user.root_user_id.clone().filter(|r| !r.is_empty());
        let transactions = user.transactions.iter().map(json_text).collect::<Vec<_>>();

        view! {
            <DetailCard heading=format!("Full Name: {}", full_name)>
                {control.view(active, toggle)}
                {field("Email", user.email.clone())}
                {field("Username", text_or_missing(user.username.as_deref()))}
                {field("Phone Number", user.formatted_phone())}
                {field("Account Type", text_or_missing(user.account_type.as_deref()))}
                {field("City", text_or_missing(user.city.as_deref()))}
                {field("Province", text_or_missing(user.province.as_deref()))}
                {field("Specific Address", text_or_missing(user.specific_address.as_deref()))}
                <p>
                    <span class="font-semibold">"Root Account: "</span>
                    {match root {
                        Some(root) => view! {
                            <Link to=AppRoute::CustomerDetail(root.clone()) class="link link-primary">{root}</Link>
                        }
                        .into_any(),
                        None => MISSING_DATE.into_any(),
                    }}
                </p>
                {field("Authenticated", if user.is_verified.unwrap_or(false) { "Yes" } else { "No" }.to_string())}
                {field("Active Status", if active { "Active" } else { "Inactive" }.to_string())}
                {field(
                    "Plan",
                    user.plan.as_ref().map(|p| p.name.clone()).unwrap_or_else(|| "No plan assigned".to_string()),
                )}
                <h4 class="font-bold mt-4">"Transactions"</h4>
                {if transactions.is_empty() {
                    view! { <p class="text-sm">"No transactions found"</p> }.into_any()
                } else {
                    transactions
                        .into_iter()
                        .map(|tx| view! {
                            <p class="text-sm">
                                <Link to=AppRoute::TransactionDetail(tx.clone()) class="link">
                                    {format!("Transaction ID: {}", tx)}
                                </Link>
                            </p>
                        })
                        .collect_view()
                        .into_any()
                }}
            </DetailCard>
        }
        .into_any()
    });

    view! { <Layout title="User Detail">{body}</Layout> }
}

#[component]
pub fn CompanyDetailPage(id: String) -> impl IntoView {
    let state = use_entity::<Company>(&id);

    let body = render_loadable(state, move |company: Company| {
        let document = match company.uploaded_document.clone() {
            Some(doc) => view! {
                <div class="pl-4 text-sm">
                    {field("Filename", text_or_missing(Some(&doc.filename)))}
                    {field("Path", text_or_missing(Some(&doc.path)))}
                    {field("Mimetype", text_or_missing(Some(&doc.mimetype)))}
                    {field(
                        "Size",
                        if doc.size > 0 { format!("{} bytes", doc.size) } else { MISSING_DATE.to_string() },
                    )}
                    {field("Upload Date", format_date(doc.upload_date.as_ref()))}
                </div>
            }
            .into_any(),
            None => view! { <p class="pl-4 text-sm">"No Document Uploaded"</p> }.into_any(),
        };

        view! {
            <DetailCard heading=company.company_name.clone()>
                {field("TIN Number", text_or_missing(Some(&company.tin_number)))}
                {field("Industry", text_or_missing(Some(&company.industry)))}
                <p class="font-semibold">"Uploaded Document:"</p>
                {document}
                {field("User Count", company.user_count.to_string())}
            </DetailCard>
        }
        .into_any()
    });

    view! { <Layout title="Company Detail">{body}</Layout> }
}

#[component]
pub fn SubscriptionDetailPage(id: String) -> impl IntoView {
    let state = use_entity::<Subscription>(&id);

    let body = render_loadable(state, move |sub: Subscription| {
        let orders = sub
            .orders
            .iter()
            .map(|order_id| {
                let order_id = order_id.clone();
                view! {
                    <li>
                        <Link to=AppRoute::OrderDetail(order_id.clone()) class="link">{order_id}</Link>
                    </li>
                }
            })
            .collect_view();

        let transactions = if sub.transactions.is_empty() {
            view! { <p class="text-sm">"No Transactions"</p> }.into_any()
        } else {
            sub.transactions
                .iter()
                .map(|tx| {
                    let duration = tx
                        .duration
                        .as_ref()
                        .map(json_text)
                        .unwrap_or_else(|| MISSING_DATE.to_string());
                    let transaction_id = tx.transaction_id.clone();
                    view! {
                        <div class="text-sm">
                            <Link to=AppRoute::TransactionDetail(transaction_id.clone()) class="link">
                                {transaction_id}
                            </Link>
                            <span class="ml-2">{format!("Duration: {} months", duration)}</span>
                        </div>
                    }
                })
                .collect_view()
                .into_any()
        };

        view! {
            <DetailCard heading=format!("Subscription ID: {}", sub.id)>
                {field("Total Amount", format!("${:.2}", sub.subscription_total))}
                {field("Due Date", format_date(sub.due_date.as_ref()))}
                <p>
                    <span class="font-semibold">"Root Account: "</span>
                    <Link to=AppRoute::CustomerDetail(sub.root_user_id.clone()) class="link link-primary">
                        {sub.root_user_id.clone()}
                    </Link>
                </p>
                <p class="font-semibold">"Orders:"</p>
                <ul class="pl-4 list-disc">{orders}</ul>
                <p class="font-semibold">"Transactions:"</p>
                {transactions}
            </DetailCard>
        }
        .into_any()
    });

    view! { <Layout title="Subscription Detail">{body}</Layout> }
}

#[component]
pub fn OrderDetailPage(id: String) -> impl IntoView {
    let state = use_entity::<Order>(&id);

    let body = render_loadable(state, move |order: Order| {
        let machines = order.order.clone().unwrap_or_default().vm;
        let vm_table = if machines.is_empty() {
            view! { <p class="text-sm">"No virtual machines on this order"</p> }.into_any()
        } else {
            view! {
                <div class="overflow-x-auto">
                    <table class="table table-sm">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Image ID"</th>
                                <th>"Disk Size"</th>
                                <th>"Instance Type"</th>
                                <th>"vCPU"</th>
                                <th>"RAM"</th>
                                <th>"Duration"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {machines
                                .into_iter()
                                .map(|vm| view! {
                                    <tr>
                                        <td>{vm.name}</td>
                                        <td>{vm.image_id}</td>
                                        <td>{format!("{} GB", vm.disk_size)}</td>
                                        <td>{vm.instance_type}</td>
                                        <td>{vm.vcpu}</td>
                                        <td>{format!("{} GB", vm.ram)}</td>
                                        <td>
                                            {vm.duration
                                                .as_ref()
                                                .map(|d| format!("{} hours", json_text(d)))
                                                .unwrap_or_else(|| MISSING_DATE.to_string())}
                                        </td>
                                    </tr>
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                </div>
            }
            .into_any()
        };

        view! {
            <DetailCard heading=format!("Order ID: {}", order.id)>
                {field("Order Type", text_or_missing(Some(&order.order_type)))}
                {field("Status", text_or_missing(Some(&order.status)))}
                {field("Total", format!("${:.2}", order.total))}
                <h4 class="font-bold mt-4">"Virtual Machines"</h4>
                {vm_table}
            </DetailCard>
        }
        .into_any()
    });

    view! { <Layout title="Order Detail">{body}</Layout> }
}

#[component]
pub fn TransactionDetailPage(id: String) -> impl IntoView {
    let state = use_entity::<Transaction>(&id);

    let body = render_loadable(state, move |tx: Transaction| {
        let payment_url = tx
            .payment_method_info
            .as_ref()
            .and_then(|info| info.payment_url.clone())
            .filter(|url| !url.is_empty());
        let order_id = tx.order_id().map(str::to_string);

        view! {
            <DetailCard heading=format!("Transaction ID: {}", tx.id)>
                {field("Payment Method", text_or_missing(Some(&tx.payment_method)))}
                <p>
                    <span class="font-semibold">"Payment URL: "</span>
                    {match payment_url {
                        Some(url) => view! {
                            <a href=url.clone() target="_blank" rel="noopener noreferrer" class="link">{url.clone()}</a>
                        }
                        .into_any(),
                        None => MISSING_DATE.into_any(),
                    }}
                </p>
                <p>
                    <span class="font-semibold">"Order: "</span>
                    {match order_id {
                        Some(order_id) => view! {
                            <Link to=AppRoute::OrderDetail(order_id.clone()) class="link link-primary">{order_id}</Link>
                        }
                        .into_any(),
                        None => MISSING_DATE.into_any(),
                    }}
                </p>
                {field("Total", format!("${:.2}", tx.total))}
                {field("Status", text_or_missing(Some(&tx.status)))}
            </DetailCard>
        }
        .into_any()
    });

    view! { <Layout title="Transaction Detail">{body}</Layout> }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_text_unquotes_strings() {
        assert_eq!(json_text(&serde_json::json!("tx-1")), "tx-1");
        assert_eq!(json_text(&serde_json::json!(12)), "12");
    }

    #[test]
    fn test_text_or_missing() {
        assert_eq!(text_or_missing(Some("Addis Ababa")), "Addis Ababa");
        assert_eq!(text_or_missing(Some("  ")), "N/A");
        assert_eq!(text_or_missing(None), "N/A");
    }
}
