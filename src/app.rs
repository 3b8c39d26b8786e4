use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    StaticSegment,
};

use crate::pages::{sign_in::DesktopSignIn, upload::UploadPage, Index};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/boonda.css"/>
        <Title text="Boonda - Share files in a flash"/>
        <Router>
            <main class="min-h-screen font-main">
                <Routes fallback=|| view! { <p class="p-4">"Page not found."</p> }>
                    <Route path=StaticSegment("") view=Index/>
                    <Route path=StaticSegment("upload") view=UploadPage/>
                    <Route path=StaticSegment("desktop-sign-in") view=DesktopSignIn/>
                </Routes>
            </main>
        </Router>
    }
}
