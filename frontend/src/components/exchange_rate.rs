use crate::auth::use_auth;
use crate::components::layout::Layout;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 当前汇率显示文本 (两位小数，单位 ETB)
fn rate_label(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2} ETB", rate),
        None => "Loading...".to_string(),
    }
}

#[component]
pub fn ExchangeRatePage() -> impl IntoView {
    let auth = use_auth();

    let current = RwSignal::new(None::<f64>);
    let new_rate = RwSignal::new(String::new());
    let is_submitting = RwSignal::new(false);
    let error_msg = RwSignal::new(None::<String>);
    let success_msg = RwSignal::new(None::<String>);

    spawn_local(async move {
        match auth.api().exchange_rate().await {
            Ok(rate) => {
                let _ = current.try_set(Some(rate));
            }
            Err(e) => {
                log::warn!("[ExchangeRate] Failed to fetch exchange rate: {}", e);
                auth.handle_error(&e);
                let _ = error_msg.try_set(Some(e.message().to_string()));
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        is_submitting.set(true);
        error_msg.set(None);
        success_msg.set(None);

        let input = new_rate.get_untracked();
        spawn_local(async move {
            match auth.api().update_exchange_rate(&input).await {
                Ok(rate) => {
                    let _ = current.try_set(Some(rate));
                    let _ = new_rate.try_set(String::new());
                    let _ = success_msg.try_set(Some(format!("Exchange rate updated to {:.2}", rate)));
                }
                Err(e) => {
                    auth.handle_error(&e);
                    let _ = error_msg.try_set(Some(e.message().to_string()));
                }
            }
            let _ = is_submitting.try_set(false);
        });
    };

    view! {
        <Layout title="Exchange Rate">
            <div class="flex justify-center">
                <div class="card w-full max-w-md bg-base-100 shadow-xl">
                    <form class="card-body gap-4" on:submit=on_submit>
                        <h3 class="card-title justify-center text-2xl">
                            "Current Exchange Rate: "
                            {move || rate_label(current.get())}
                        </h3>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || success_msg.get().is_some()>
                            <div role="alert" class="alert alert-success">
                                <span>{move || success_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <label class="form-control w-full">
                            <span class="label-text mb-1">"New Exchange Rate"</span>
                            <input
                                type="text"
                                inputmode="decimal"
                                class="input input-bordered w-full"
                                prop:value=move || new_rate.get()
                                on:input=move |ev| new_rate.set(event_target_value(&ev))
                            />
                        </label>
                        <button class="btn btn-primary w-full" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Updating..." }.into_any()
                            } else {
                                "Update Rate".into_any()
                            }}
                        </button>
                    </form>
                </div>
            </div>
        </Layout>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_label() {
        assert_eq!(rate_label(Some(56.756)), "56.76 ETB");
        assert_eq!(rate_label(None), "Loading...");
    }
}
