#![deny(clippy::unwrap_used)]

use leptos::{prelude::*, server_fn::codec::JsonEncoding};

pub mod app;
pub mod pages;
#[cfg(feature = "ssr")]
pub mod routes;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}

/// Sign-in context the auth form was rendered for. Only the desktop route is
/// mounted today; the desktop app hands off to the browser and waits for a
/// ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Intent {
    Desktop,
    Web,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Desktop => "desktop-sign-in",
            Intent::Web => "web-sign-in",
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desktop-sign-in" => Ok(Intent::Desktop),
            "web-sign-in" => Ok(Intent::Web),
            _ => Err(()),
        }
    }
}

/// What a successful sign-in hands back to the page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignInReceipt {
    pub ticket: String,
    pub intent: Intent,
    pub expires_in_secs: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum AppError {
    InternalServerError(String),
    BadRequest,
    NotFound,
    PayloadTooLarge,
    Leptos(ServerFnErrorErr),
}

#[cfg(feature = "ssr")]
impl From<crate::routes::RouteError> for AppError {
    fn from(err: crate::routes::RouteError) -> Self {
        use crate::routes::RouteError;
        match err {
            RouteError::NotFound => AppError::NotFound,
            RouteError::BadRequest => AppError::BadRequest,
            RouteError::PayloadTooLarge => AppError::PayloadTooLarge,
            _ => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl FromServerFnError for AppError {
    type Encoder = JsonEncoding;
    fn from_server_fn_error(value: leptos::prelude::ServerFnErrorErr) -> Self {
        Self::Leptos(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn intent_round_trips_through_its_wire_form() {
        for intent in [Intent::Desktop, Intent::Web] {
            assert_eq!(Intent::from_str(intent.as_str()), Ok(intent));
        }
    }

    #[test]
    fn unknown_intent_is_rejected() {
        assert!(Intent::from_str("mobile-sign-in").is_err());
        assert!(Intent::from_str("").is_err());
    }
}
