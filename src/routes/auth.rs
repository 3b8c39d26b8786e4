use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Alphanumeric, DistString};

use crate::pages::sign_in::{looks_like_email, MIN_PASSWORD_LEN};
use crate::routes::{RouteError, RouteState};
use crate::{Intent, SignInReceipt};

pub const TICKET_TTL_SECS: i64 = 300;
const TICKET_LEN: usize = 8;

/// A pending desktop handoff. The desktop app exchanges the code for a
/// session before it expires.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub email: String,
    pub intent: Intent,
    pub issued_at: DateTime<Utc>,
}

pub async fn sign_in_handler(
    state: &RouteState,
    email: String,
    password: String,
    intent: Intent,
) -> Result<SignInReceipt, RouteError> {
    if !looks_like_email(&email) || password.len() < MIN_PASSWORD_LEN {
        return Err(RouteError::BadRequest);
    }

    let ticket = issue_ticket(state, email, intent, Utc::now()).await;
    tracing::info!(intent = intent.as_str(), "issued sign-in ticket");

    Ok(SignInReceipt {
        ticket,
        intent,
        expires_in_secs: TICKET_TTL_SECS,
    })
}

/// Stores a fresh ticket, pruning anything past its TTL first.
pub(crate) async fn issue_ticket(
    state: &RouteState,
    email: String,
    intent: Intent,
    now: DateTime<Utc>,
) -> String {
    let mut tickets = state.tickets.lock().await;
    tickets.retain(|_, t| now - t.issued_at < Duration::seconds(TICKET_TTL_SECS));

    let code = loop {
        let candidate = Alphanumeric
            .sample_string(&mut rand::thread_rng(), TICKET_LEN)
            .to_uppercase();
        if !tickets.contains_key(&candidate) {
            break candidate;
        }
    };
    tickets.insert(
        code.clone(),
        Ticket {
            email,
            intent,
            issued_at: now,
        },
    );
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, sync::Arc};
    use tokio::sync::Mutex;

    fn state() -> RouteState {
        RouteState {
            upload_dir: std::env::temp_dir(),
            public_url: "http://test.invalid".to_string(),
            max_upload_bytes: 1024,
            tickets: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[tokio::test]
    async fn issues_distinct_well_formed_tickets() {
        let state = state();
        let now = Utc::now();
        let a = issue_ticket(&state, "a@example.com".into(), Intent::Desktop, now).await;
        let b = issue_ticket(&state, "b@example.com".into(), Intent::Desktop, now).await;

        assert_ne!(a, b);
        for code in [&a, &b] {
            assert_eq!(code.len(), TICKET_LEN);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(!code.chars().any(|c| c.is_ascii_lowercase()));
        }
        assert_eq!(state.tickets.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn expired_tickets_are_pruned_on_issue() {
        let state = state();
        let old = Utc::now() - Duration::seconds(TICKET_TTL_SECS + 1);
        let stale = issue_ticket(&state, "a@example.com".into(), Intent::Desktop, old).await;
        let fresh = issue_ticket(&state, "b@example.com".into(), Intent::Desktop, Utc::now()).await;

        let tickets = state.tickets.lock().await;
        assert!(!tickets.contains_key(&stale));
        assert!(tickets.contains_key(&fresh));
        assert_eq!(tickets.len(), 1);
    }

    #[tokio::test]
    async fn rejects_implausible_credentials() {
        let state = state();
        let res = sign_in_handler(
            &state,
            "not-an-email".into(),
            "long enough password".into(),
            Intent::Desktop,
        )
        .await;
        assert!(matches!(res, Err(RouteError::BadRequest)));

        let res = sign_in_handler(
            &state,
            "ada@example.com".into(),
            "short".into(),
            Intent::Desktop,
        )
        .await;
        assert!(matches!(res, Err(RouteError::BadRequest)));
        assert!(state.tickets.lock().await.is_empty());
    }

    #[tokio::test]
    async fn good_credentials_issue_a_receipt() {
        let state = state();
        let res = sign_in_handler(
            &state,
            "ada@example.com".into(),
            "a fine password".into(),
            Intent::Desktop,
        )
        .await
        .expect("receipt");

        assert_eq!(res.intent, Intent::Desktop);
        assert_eq!(res.expires_in_secs, TICKET_TTL_SECS);

        let tickets = state.tickets.lock().await;
        let ticket = tickets.get(&res.ticket).expect("stored ticket");
        assert_eq!(ticket.email, "ada@example.com");
        assert_eq!(ticket.intent, Intent::Desktop);
    }
}
