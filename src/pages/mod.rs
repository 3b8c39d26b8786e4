use leptos::prelude::*;
use leptos_router::components::*;

pub mod sign_in;
pub mod upload;

#[component]
pub fn Index() -> impl IntoView {
    view! {
        <div class="min-h-screen flex flex-col justify-center items-center gap-6 p-4 text-center">
            <h1 class="text-5xl font-bold font-mono">Boonda</h1>
            <p class="max-w-md text-lg">
                "Drop a file, get a link, send it anywhere. Files are shared
                straight from your browser, no setup required."
            </p>
            <ShareNowButton/>
            <p class="text-sm text-gray-600">
                "Have a Boonda account? "
                <span class="underline">
                    <A href="/desktop-sign-in">"Sign in"</A>
                </span> " to unlock higher limits."
            </p>
        </div>
    }
}

#[component]
pub fn ShareNowButton() -> impl IntoView {
    view! {
        <span class="inline-flex">
            <A
                href="/upload"
                attr:class="inline-flex items-center gap-2 px-6 py-3 text-xl font-bold bg-amber-400 hover:bg-amber-500 border-2 border-black shadow-blocks-tiny rounded-sm transition"
            >
                "Share now"
                <svg
                    class="size-4"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    <path d="m9 18 6-6-6-6"></path>
                </svg>
            </A>
        </span>
    }
}
