use leptos::prelude::*;
use leptos_meta::Title;

use crate::{AppError, Intent, SignInReceipt};

pub const MIN_PASSWORD_LEN: usize = 8;

#[server]
pub async fn sign_in(
    email: String,
    password: String,
    intent: String,
) -> Result<SignInReceipt, AppError> {
    let intent = intent.parse::<Intent>().map_err(|_| AppError::BadRequest)?;
    let state = expect_context::<crate::routes::RouteState>();
    Ok(crate::routes::auth::sign_in_handler(&state, email, password, intent).await?)
}

/// Good enough to gate the submit button; the server re-checks.
pub fn looks_like_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !s.chars().any(char::is_whitespace)
}

#[component]
pub fn DesktopSignIn() -> impl IntoView {
    view! {
        <Title text="Boonda - Sign In"/>
        <div class="min-h-screen flex flex-col justify-center items-center p-4">
            <AuthForm intent=Intent::Desktop/>
        </div>
    }
}

#[component]
pub fn AuthForm(intent: Intent) -> impl IntoView {
    let act = ServerAction::<SignIn>::new();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let form_ready = move || {
        looks_like_email(&email.get()) && password.get().len() >= MIN_PASSWORD_LEN
    };

    view! {
        <div class="w-11/12 sm:w-96 p-6 sm:p-8 border-2 rounded border-black shadow-blocks-sm bg-gradient-to-tr from-amber-100 to-amber-200 flex flex-col gap-4">
            {move || {
                if let Some(Ok(receipt)) = act.value().get() {
                    view! { <SignedIn receipt=receipt/> }.into_any()
                } else {
                    view! {
                        <h1 class="text-3xl font-bold text-center">"Sign in to Boonda"</h1>
                        <ActionForm action=act attr:class="flex flex-col gap-4">
                            <input type="hidden" name="intent" value=intent.as_str()/>
                            <div class="flex flex-col gap-1">
                                <label class="font-bold" for="email">Email</label>
                                <input
                                    class="border-2 border-black p-2 rounded-sm focus:outline-none"
                                    id="email"
                                    name="email"
                                    type="email"
                                    autocomplete="email"
                                    on:input:target=move |ev| set_email.set(ev.target().value())
                                />
                            </div>
                            <div class="flex flex-col gap-1">
                                <label class="font-bold" for="password">Password</label>
                                <input
                                    class="border-2 border-black p-2 rounded-sm focus:outline-none"
                                    id="password"
                                    name="password"
                                    type="password"
                                    autocomplete="current-password"
                                    on:input:target=move |ev| set_password.set(ev.target().value())
                                />
                            </div>
                            <button
                                class="px-3 py-2 text-xl font-bold bg-amber-400 hover:bg-amber-500 border-2 border-black shadow-blocks-tiny disabled:shadow-none rounded-sm disabled:bg-gray-100 disabled:hover:bg-gray-100 transition"
                                type="submit"
                                disabled=move || !form_ready() || act.pending().get()
                            >
                                {move || {
                                    if act.pending().get() { "Signing in..." } else { "Sign in" }
                                }}
                            </button>
                        </ActionForm>
                        <Show when=move || matches!(act.value().get(), Some(Err(_)))>
                            <p class="text-red-600 text-sm">
                                "Couldn't sign you in. Check your email and password and
                                try again."
                            </p>
                        </Show>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn SignedIn(receipt: SignInReceipt) -> impl IntoView {
    let minutes = receipt.expires_in_secs / 60;
    view! {
        <div class="flex flex-col gap-3 text-center">
            <h1 class="text-3xl font-bold">"You're signed in!"</h1>
            {match receipt.intent {
                Intent::Desktop => {
                    view! {
                        <p>"Enter this code in the Boonda desktop app to finish signing in:"</p>
                        <p class="text-4xl font-mono font-bold tracking-widest bg-white border-2 border-black rounded-sm py-3">
                            {receipt.ticket}
                        </p>
                        <p class="text-sm text-gray-700">
                            "The code expires in " {minutes} " minutes."
                        </p>
                    }
                        .into_any()
                }
                Intent::Web => {
                    view! { <p>"You can close this page now."</p> }.into_any()
                }
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_addresses_pass() {
        assert!(looks_like_email("ada@example.com"));
        assert!(looks_like_email("a.b+c@mail.example.co"));
    }

    #[test]
    fn implausible_addresses_fail() {
        assert!(!looks_like_email(""));
        assert!(!looks_like_email("no-at-sign"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("ada@"));
        assert!(!looks_like_email("ada@nodot"));
        assert!(!looks_like_email("ada@.example.com"));
        assert!(!looks_like_email("ada @example.com"));
    }
}
