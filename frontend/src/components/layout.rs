use crate::auth::{logout, use_auth};
use crate::components::icons::{LogOut, UserCircle};
use crate::web::router::{Link, use_router};
use admin_console::AppRoute;
use leptos::prelude::*;

/// 导航栏中的条目
const NAV_ITEMS: [(&str, AppRoute); 6] = [
    ("Customers", AppRoute::Customers),
    ("Companies", AppRoute::Companies),
    ("Subscriptions", AppRoute::Subscriptions),
    ("Orders", AppRoute::Orders),
    ("Transactions", AppRoute::Transactions),
    ("Exchange Rate", AppRoute::ExchangeRate),
];

/// 受保护页面的外框：导航栏 + 资料菜单 + 内容
#[component]
pub fn Layout(#[prop(into)] title: String, children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let display_name = move || {
        auth.state
            .get()
            .profile
            .map(|p| p.display_name())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Administrator".to_string())
    };

    let nav_class = move |route: &AppRoute| {
        if router.current_route().get_untracked() == *route {
            "btn btn-ghost btn-sm btn-active"
        } else {
            "btn btn-ghost btn-sm"
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-1 flex-wrap">
                        <span class="text-xl font-bold px-2">"Billing Admin"</span>
                        {NAV_ITEMS
                            .into_iter()
                            .map(|(label, route)| {
                                let class = nav_class(&route);
                                view! { <Link to=route class=class>{label}</Link> }
                            })
                            .collect_view()}
                    </div>
                    <div class="flex-none">
                        <div class="dropdown dropdown-end">
                            <div tabindex="0" role="button" class="btn btn-ghost gap-2">
                                <UserCircle attr:class="h-5 w-5" />
                                {display_name}
                            </div>
                            <ul tabindex="0" class="menu dropdown-content bg-base-100 rounded-box z-10 w-48 p-2 shadow">
                                <li>
                                    <button on:click=move |_| logout(&auth)>
                                        <LogOut attr:class="h-4 w-4" /> "Logout"
                                    </button>
                                </li>
                            </ul>
                        </div>
                    </div>
                </div>

                <h2 class="text-2xl font-bold">{title}</h2>
                {children()}
            </div>
        </div>
    }
}
