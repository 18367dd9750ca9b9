//! 各实体的列表页面
//!
//! 页面本身只负责列定义；分页、排序、搜索与错误处理都由 `use_collection` 与通用组件完成。

use crate::auth::use_auth;
use crate::components::collection::{
    EmptyRows, ErrorBanner, Pagination, SearchBar, SortHeader, use_collection,
};
use crate::components::layout::Layout;
use crate::web::router::Link;
use admin_console::AppRoute;
use admin_console_shared::date::format_date;
use leptos::prelude::*;

fn status_badge(active: bool) -> AnyView {
    if active {
        view! { <span class="badge badge-success">"Active"</span> }.into_any()
    } else {
        view! { <span class="badge badge-ghost">"Inactive"</span> }.into_any()
    }
}

#[component]
pub fn CustomersPage() -> impl IntoView {
    let list = use_collection(use_auth().api().customers());
    let (info, actions, rows) = (list.info, list.actions, list.rows());

    view! {
        <Layout title="Customers">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-4">
                        <SearchBar actions=actions placeholder="Search accounts" />
                    </div>
                    <ErrorBanner info=info actions=actions />
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <SortHeader label="ID" field="_id" info=info actions=actions />
                                    <SortHeader label="Account Name" field="accountName" info=info actions=actions />
                                    <SortHeader label="Status" field="active" info=info actions=actions />
                                    <SortHeader label="Expire Date" field="expireDate" info=info actions=actions />
                                    <SortHeader label="Closed Date" field="closedDate" info=info actions=actions />
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <EmptyRows info=info colspan=6 />
                                <For each=move || rows.get() key=|r| r.id.clone() let:account>
                                    <tr>
                                        <td>
                                            {
                                                let id = account.id.clone();
                                                view! {
                                                    <Link to=AppRoute::CustomerDetail(id.clone()) class="link link-primary">
                                                        {id}
                                                    </Link>
                                                }
                                            }
                                        </td>
                                        <td>{account.account_name.clone()}</td>
                                        <td>{status_badge(account.active)}</td>
                                        <td>{format_date(account.expire_date.as_ref())}</td>
                                        <td>{format_date(account.closed_date.as_ref())}</td>
                                        <td>
                                            <Link to=AppRoute::Users(account.id.clone()) class="btn btn-sm btn-outline">
                                                "Display Users"
                                            </Link>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                    <Pagination info=info actions=actions />
                </div>
            </div>
        </Layout>
    }
}

/// 某个根账户下的子用户
#[component]
pub fn UsersPage(root_user_id: String) -> impl IntoView {
    let list = use_collection(use_auth().api().users(&root_user_id));
    let (info, actions, rows) = (list.info, list.actions, list.rows());

    view! {
        <Layout title="Users">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-4 flex items-center justify-between gap-4">
                        <SearchBar actions=actions placeholder="Search users" />
                        <Link to=AppRoute::CustomerDetail(root_user_id.clone()) class="btn btn-sm btn-ghost">
                            "Root account"
                        </Link>
                    </div>
                    <ErrorBanner info=info actions=actions />
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <SortHeader label="ID" field="_id" info=info actions=actions />
                                    <SortHeader label="First Name" field="firstName" info=info actions=actions />
                                    <SortHeader label="Last Name" field="lastName" info=info actions=actions />
                                    <SortHeader label="Email" field="email" info=info actions=actions />
                                    <th>"Phone Number"</th>
                                    <SortHeader label="City" field="city" info=info actions=actions />
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <EmptyRows info=info colspan=7 />
                                <For each=move || rows.get() key=|u| u.id.clone() let:user>
                                    <tr>
                                        <td>{user.id.clone()}</td>
                                        <td>{user.first_name.clone()}</td>
                                        <td>{user.last_name.clone()}</td>
                                        <td>{user.email.clone()}</td>
                                        <td>{user.formatted_phone()}</td>
                                        <td>{user.city.clone().unwrap_or_default()}</td>
                                        <td>
                                            <Link to=AppRoute::UserDetail(user.id.clone()) class="btn btn-sm btn-outline">
                                                "Details"
                                            </Link>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                    <Pagination info=info actions=actions />
                </div>
            </div>
        </Layout>
    }
}

#[component]
pub fn CompaniesPage() -> impl IntoView {
    let list = use_collection(use_auth().api().companies());
    let (info, actions, rows) = (list.info, list.actions, list.rows());

    view! {
        <Layout title="Companies">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-4">
                        <SearchBar actions=actions placeholder="Search companies" />
                    </div>
                    <ErrorBanner info=info actions=actions />
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <SortHeader label="ID" field="_id" info=info actions=actions />
                                    <SortHeader label="Company Name" field="companyName" info=info actions=actions />
                                    <SortHeader label="TIN Number" field="TINNumber" info=info actions=actions />
                                    <SortHeader label="Industry" field="industry" info=info actions=actions />
                                    <th>"Document"</th>
                                    <SortHeader label="User Count" field="userCount" info=info actions=actions />
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <EmptyRows info=info colspan=7 />
                                <For each=move || rows.get() key=|c| c.id.clone() let:company>
                                    <tr>
                                        <td>{company.id.clone()}</td>
                                        <td>{company.company_name.clone()}</td>
                                        <td>{company.tin_number.clone()}</td>
                                        <td>{company.industry.clone()}</td>
                                        <td>
                                            {company
                                                .uploaded_document
                                                .as_ref()
                                                .map(|doc| doc.filename.clone())
                                                .unwrap_or_else(|| "N/A".to_string())}
                                        </td>
                                        <td>{company.user_count}</td>
                                        <td>
                                            <Link to=AppRoute::CompanyDetail(company.id.clone()) class="btn btn-sm btn-outline">
                                                "Details"
                                            </Link>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                    <Pagination info=info actions=actions />
                </div>
            </div>
        </Layout>
    }
}

#[component]
pub fn SubscriptionsPage() -> impl IntoView {
    let list = use_collection(use_auth().api().subscriptions());
    let (info, actions, rows) = (list.info, list.actions, list.rows());

    view! {
        <Layout title="Subscriptions">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-4">
                        <SearchBar actions=actions placeholder="Search subscriptions" />
                    </div>
                    <ErrorBanner info=info actions=actions />
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <SortHeader label="ID" field="_id" info=info actions=actions />
                                    <SortHeader label="Total Amount" field="subscriptionTotal" info=info actions=actions />
                                    <SortHeader label="Due Date" field="dueDate" info=info actions=actions />
                                    <th>"Root Account"</th>
                                    <th>"Orders"</th>
                                    <th>"Transactions"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <EmptyRows info=info colspan=7 />
                                <For each=move || rows.get() key=|s| s.id.clone() let:sub>
                                    <tr>
                                        <td>{sub.id.clone()}</td>
                                        <td>{format!("${:.2}", sub.subscription_total)}</td>
                                        <td>{format_date(sub.due_date.as_ref())}</td>
                                        <td>
                                            <Link to=AppRoute::CustomerDetail(sub.root_user_id.clone()) class="link">
                                                {sub.root_user_id.clone()}
                                            </Link>
                                        </td>
                                        <td>{sub.orders.len()}</td>
                                        <td>{sub.transactions.len()}</td>
                                        <td>
                                            <Link to=AppRoute::SubscriptionDetail(sub.id.clone()) class="btn btn-sm btn-outline">
                                                "View"
                                            </Link>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                    <Pagination info=info actions=actions />
                </div>
            </div>
        </Layout>
    }
}

#[component]
pub fn OrdersPage() -> impl IntoView {
    let list = use_collection(use_auth().api().orders());
    let (info, actions, rows) = (list.info, list.actions, list.rows());

    view! {
        <Layout title="Orders">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-4">
                        <SearchBar actions=actions placeholder="Search orders" />
                    </div>
                    <ErrorBanner info=info actions=actions />
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <SortHeader label="ID" field="_id" info=info actions=actions />
                                    <SortHeader label="Type" field="orderType" info=info actions=actions />
                                    <SortHeader label="Status" field="status" info=info actions=actions />
                                    <SortHeader label="Total" field="total" info=info actions=actions />
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <EmptyRows info=info colspan=5 />
                                <For each=move || rows.get() key=|o| o.id.clone() let:order>
                                    <tr>
                                        <td>{order.id.clone()}</td>
                                        <td>{order.order_type.clone()}</td>
                                        <td>{order.status.clone()}</td>
                                        <td>{format!("${:.2}", order.total)}</td>
                                        <td>
                                            <Link to=AppRoute::OrderDetail(order.id.clone()) class="btn btn-sm btn-outline">
                                                "View"
                                            </Link>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                    <Pagination info=info actions=actions />
                </div>
            </div>
        </Layout>
    }
}

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let list = use_collection(use_auth().api().transactions());
    let (info, actions, rows) = (list.info, list.actions, list.rows());

    view! {
        <Layout title="Transactions">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-4">
                        <SearchBar actions=actions placeholder="Search transactions" />
                    </div>
                    <ErrorBanner info=info actions=actions />
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <SortHeader label="ID" field="_id" info=info actions=actions />
                                    <SortHeader label="Payment Method" field="paymentMethod" info=info actions=actions />
                                    <SortHeader label="Total" field="total" info=info actions=actions />
                                    <SortHeader label="Status" field="status" info=info actions=actions />
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <EmptyRows info=info colspan=5 />
                                <For each=move || rows.get() key=|t| t.id.clone() let:tx>
                                    <tr>
                                        <td>{tx.id.clone()}</td>
                                        <td>{tx.payment_method.clone()}</td>
                                        <td>{format!("${:.2}", tx.total)}</td>
                                        <td>{tx.status.clone()}</td>
                                        <td>
                                            <Link to=AppRoute::TransactionDetail(tx.id.clone()) class="btn btn-sm btn-outline">
                                                "View"
                                            </Link>
                                        </td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </div>
                    <Pagination info=info actions=actions />
                </div>
            </div>
        </Layout>
    }
}
