use std::time::Duration;

use leptos::{html, prelude::*, task::spawn_local};
use leptos_meta::Title;
use server_fn::codec::{MultipartData, MultipartFormData};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FileList, FormData};

use crate::AppError;

const FILE_REQUIRED: &str = "File is required";
const FILE_TYPE_INVALID: &str = "File type is not valid";
const UPLOAD_FAILED: &str = "An error occurred while uploading the file";

/// Receives the multipart upload, persists it, and returns the share URL.
#[server(input = MultipartFormData)]
pub async fn upload_file(data: MultipartData) -> Result<String, AppError> {
    let state = expect_context::<crate::routes::RouteState>();
    let mut data = data.into_inner().expect("multipart data on the server");

    while let Ok(Some(mut field)) = data.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
            if bytes.len() as u64 > state.max_upload_bytes {
                return Err(AppError::PayloadTooLarge);
            }
        }

        return Ok(crate::routes::upload::store_upload(&state, &file_name, &content_type, bytes).await?);
    }

    Err(AppError::BadRequest)
}

/// Selection rules for the upload form. A missing selection and a file the
/// browser can't type both block submission.
fn selection_error(file_type: Option<&str>) -> Option<&'static str> {
    match file_type {
        None => Some(FILE_REQUIRED),
        Some("") => Some(FILE_TYPE_INVALID),
        Some(_) => None,
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    view! {
        <Title text="Boonda - Upload"/>
        <div class="min-h-screen flex flex-col justify-center items-center p-4">
            <UploadForm/>
        </div>
    }
}

#[component]
pub fn UploadForm() -> impl IntoView {
    let input_ref: NodeRef<html::Input> = NodeRef::new();
    let (file_name, set_file_name) = signal(None::<String>);
    let (field_error, set_field_error) = signal(None::<&'static str>);
    let (dragging, set_dragging) = signal(false);
    let (uploading, set_uploading) = signal(false);
    let toast = RwSignal::new(None::<&'static str>);
    let modal_url = RwSignal::new(None::<String>);

    let on_files = move |files: Option<FileList>| {
        let first = files.and_then(|list| list.get(0));
        let file_type = first.as_ref().map(|f| f.type_());
        match selection_error(file_type.as_deref()) {
            Some(msg) => {
                if let Some(input) = input_ref.get() {
                    input.set_value("");
                }
                set_file_name.set(None);
                set_field_error.set(Some(msg));
            }
            None => {
                set_file_name.set(first.map(|f| f.name()));
                set_field_error.set(None);
            }
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let selected = input_ref
            .get()
            .and_then(|input| input.files())
            .and_then(|list| list.get(0));
        let file = match selected {
            Some(file) if !file.type_().is_empty() => file,
            Some(_) => {
                set_field_error.set(Some(FILE_TYPE_INVALID));
                return;
            }
            None => {
                set_field_error.set(Some(FILE_REQUIRED));
                return;
            }
        };

        if uploading.get_untracked() {
            return;
        }
        set_uploading.set(true);

        let Ok(form_data) = FormData::new() else {
            set_uploading.set(false);
            return;
        };
        let _ = form_data.append_with_blob_and_filename("file", &file, &file.name());

        spawn_local(async move {
            let res = upload_file(form_data.into()).await;
            set_uploading.set(false);
            match res {
                Ok(url) if !url.is_empty() => modal_url.set(Some(url)),
                _ => {
                    toast.set(Some(UPLOAD_FAILED));
                    set_timeout(move || toast.set(None), Duration::from_secs(4));
                }
            }
        });
    };

    view! {
        <UploadSuccessModal url=modal_url/>
        <Toast message=toast/>
        <form
            class="flex flex-col items-center justify-center w-11/12 sm:w-96 gap-2"
            autocomplete="off"
            novalidate
            on:submit=on_submit
        >
            <label
                class=move || {
                    format!(
                        "w-full h-36 flex flex-col items-center justify-center border-2 border-dashed rounded cursor-pointer transition {}",
                        if dragging.get() {
                            "border-amber-500 bg-amber-100"
                        } else {
                            "border-black bg-white hover:bg-amber-50"
                        },
                    )
                }
                on:dragover=move |ev: leptos::ev::DragEvent| {
                    ev.prevent_default();
                    set_dragging.set(true);
                }
                on:dragleave=move |_| set_dragging.set(false)
                on:drop=move |ev: leptos::ev::DragEvent| {
                    ev.prevent_default();
                    set_dragging.set(false);
                    let files = ev.data_transfer().and_then(|dt| dt.files());
                    if let Some(input) = input_ref.get() {
                        input.set_files(files.as_ref());
                    }
                    on_files(files);
                }
            >
                <input
                    class="hidden"
                    type="file"
                    name="file"
                    node_ref=input_ref
                    on:change:target=move |ev| on_files(ev.target().files())
                />
                <p class="font-medium">"Drop a file or click here"</p>
            </label>

            <Show when=move || field_error.get().is_some()>
                <p class="text-sm font-medium text-red-600 self-start">
                    {move || field_error.get().unwrap_or_default()}
                </p>
            </Show>

            <Show when=move || file_name.get().is_some()>
                <div class="flex items-center justify-center gap-3 p-4">
                    <span class="font-bold text-green-700">"\u{2713}"</span>
                    <p class="text-sm font-medium">{move || file_name.get().unwrap_or_default()}</p>
                </div>
            </Show>

            <button
                class="w-full px-3 py-2 text-xl font-bold bg-amber-400 hover:bg-amber-500 border-2 border-black shadow-blocks-tiny disabled:shadow-none rounded-sm disabled:bg-gray-100 disabled:hover:bg-gray-100 transition inline-flex items-center justify-center gap-2"
                type="submit"
                disabled=move || uploading.get()
            >
                <Show when=move || uploading.get()>
                    <svg
                        class="size-4 animate-spin"
                        viewBox="0 0 24 24"
                        fill="none"
                        stroke="currentColor"
                        stroke-width="2"
                        stroke-linecap="round"
                    >
                        <path d="M21 12a9 9 0 1 1-6.2-8.56"></path>
                    </svg>
                </Show>
                Upload
            </button>
        </form>
    }
}

#[component]
fn UploadSuccessModal(url: RwSignal<Option<String>>) -> impl IntoView {
    let copied = RwSignal::new(false);

    view! {
        <Show when=move || url.get().is_some()>
            <div
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 p-4"
                on:click=move |_| url.set(None)
            >
                <div
                    class="w-full sm:w-[28rem] p-6 bg-white border-2 border-black rounded shadow-blocks-sm flex flex-col gap-4"
                    on:click=move |ev: leptos::ev::MouseEvent| ev.stop_propagation()
                >
                    <h2 class="text-2xl font-bold">"Your file is ready to share"</h2>
                    <p class="text-sm text-gray-600">
                        "Anyone with this link can download the file."
                    </p>
                    <input
                        class="border-2 border-black p-2 rounded-sm font-mono text-sm focus:outline-none"
                        readonly=true
                        prop:value=move || url.get().unwrap_or_default()
                    />
                    <div class="flex flex-row gap-2 justify-end">
                        <button
                            class="px-3 py-2 font-bold bg-amber-400 hover:bg-amber-500 border-2 border-black shadow-blocks-tiny rounded-sm transition"
                            on:click=move |_| {
                                let Some(link) = url.get_untracked() else { return };
                                let Some(win) = web_sys::window() else { return };
                                let write = JsFuture::from(
                                    win.navigator().clipboard().write_text(&link),
                                );
                                spawn_local(async move {
                                    if write.await.is_ok() {
                                        copied.set(true);
                                        set_timeout(
                                            move || copied.set(false),
                                            Duration::from_secs(2),
                                        );
                                    }
                                });
                            }
                        >
                            {move || if copied.get() { "Copied!" } else { "Copy link" }}
                        </button>
                        <a
                            class="px-3 py-2 font-bold bg-white hover:bg-gray-100 border-2 border-black shadow-blocks-tiny rounded-sm transition"
                            href=move || url.get().unwrap_or_default()
                            target="_blank"
                            rel="noreferrer"
                        >
                            Open
                        </a>
                        <button
                            class="px-3 py-2 font-bold bg-white hover:bg-gray-100 border-2 border-black shadow-blocks-tiny rounded-sm transition"
                            on:click=move |_| url.set(None)
                        >
                            Close
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn Toast(message: RwSignal<Option<&'static str>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <div class="fixed bottom-4 right-4 z-50 px-4 py-3 bg-red-100 border-2 border-black rounded shadow-blocks-tiny font-medium">
                {move || message.get().unwrap_or_default()}
            </div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_selection_blocks_submission() {
        assert_eq!(selection_error(None), Some(FILE_REQUIRED));
    }

    #[test]
    fn untyped_file_blocks_submission() {
        assert_eq!(selection_error(Some("")), Some(FILE_TYPE_INVALID));
    }

    #[test]
    fn typed_file_passes() {
        assert_eq!(selection_error(Some("image/png")), None);
        assert_eq!(selection_error(Some("application/octet-stream")), None);
    }
}
