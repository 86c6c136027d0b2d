//! Owner notifications sent after visitor submissions.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail transport failed: {0}")]
    Transport(String),
    #[error("mail relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("mail is not configured: {0}")]
    Misconfigured(String),
}

/// A rendered owner notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
    /// Overrides the configured owner address when set.
    pub recipient_override: Option<String>,
}

impl Notification {
    pub fn review_submitted(review: &str, name: &str, rating: f64) -> Self {
        let rating = format_rating(rating);
        Self {
            subject: "New review submitted".to_string(),
            text_body: format!(
                "A new review has been submitted:\n\nReview:\n\n{review} by {name} has given {rating} star Rating"
            ),
            html_body: Some(format!(
                "<h1>A new review has been submitted:</h1><p>Review:<br>{} by {} has given {} star Rating</p>",
                escape_html(review),
                escape_html(name),
                rating
            )),
            recipient_override: None,
        }
    }

    pub fn contact_submitted(query: &str, email: &str, contact: &str) -> Self {
        Self {
            subject: "Client contact for service".to_string(),
            text_body: format!(
                "A new client {email} has contacted for your service\n\nQuery:\t{query} contact him at {contact}"
            ),
            html_body: Some(format!(
                "<p>A new client {} has contacted for your service</p><p>Query:<br>{} contact him at {}</p>",
                escape_html(email),
                escape_html(query),
                escape_html(contact)
            )),
            recipient_override: None,
        }
    }
}

/// Delivers notifications to the site owner.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Whole ratings render without a fractional part, matching how visitors submit them.
fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 && rating.abs() < 1e15 {
        format!("{}", rating as i64)
    } else {
        rating.to_string()
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
