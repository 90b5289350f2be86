//! HTML fragments
//!
//! The only markup the server produces is the event card. Every stored
//! string is escaped before it reaches the page.

use std::fmt;

use apollo_core::{MetaKey, MetaValue};
use apollo_service::dto::{EventResponse, MetaResponse};

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn meta_text(meta: &MetaResponse, key: MetaKey) -> Option<String> {
    meta.meta
        .get(key.as_str())
        .map(MetaValue::display_text)
        .filter(|text| !text.is_empty())
}

fn meta_count(meta: &MetaResponse, key: MetaKey) -> i64 {
    meta.meta
        .get(key.as_str())
        .and_then(MetaValue::as_integer)
        .unwrap_or(0)
}

/// Listing card shown in event grids
pub struct EventCard<'a> {
    event: &'a EventResponse,
    meta: &'a MetaResponse,
}

impl<'a> EventCard<'a> {
    pub fn new(event: &'a EventResponse, meta: &'a MetaResponse) -> Self {
        Self { event, meta }
    }
}

impl fmt::Display for EventCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (event, meta) = (self.event, self.meta);
        let title = escape_html(&event.title);

        write!(f, r#"<article class="event-card" data-event-id="{}">"#, event.id)?;

        if let Some(banner) = meta_text(meta, MetaKey::EventBanner) {
            write!(
                f,
                r#"<img class="event-card__banner" src="{}" alt="{title}">"#,
                escape_html(&banner)
            )?;
        }

        write!(f, r#"<h3 class="event-card__title">{title}</h3>"#)?;

        if let Some(date) = meta_text(meta, MetaKey::EventStartDate) {
            write!(f, r#"<p class="event-card__date">{}"#, escape_html(&date))?;
            if let Some(time) = meta_text(meta, MetaKey::EventStartTime) {
                write!(f, " {}", escape_html(&time))?;
            }
            f.write_str("</p>")?;
        }

        if let Some(location) = meta_text(meta, MetaKey::EventLocation) {
            write!(
                f,
                r#"<p class="event-card__location">{}</p>"#,
                escape_html(&location)
            )?;
        }

        write!(
            f,
            concat!(
                r#"<ul class="event-card__counters">"#,
                r#"<li data-kind="favorite">{}</li>"#,
                r#"<li data-kind="bookmark">{}</li>"#,
                r#"<li data-kind="interest">{}</li>"#,
                "</ul>"
            ),
            meta_count(meta, MetaKey::FavoritesCount),
            meta_count(meta, MetaKey::BookmarksCount),
            meta_count(meta, MetaKey::InterestCount),
        )?;

        if let Some(tickets) = meta_text(meta, MetaKey::TicketsExt) {
            write!(
                f,
                r#"<a class="event-card__tickets" href="{}" rel="noopener">Tickets</a>"#,
                escape_html(&tickets)
            )?;
        }

        f.write_str("</article>")
    }
}

/// Render the listing card to a string
pub fn event_card(event: &EventResponse, meta: &MetaResponse) -> String {
    EventCard::new(event, meta).to_string()
}
