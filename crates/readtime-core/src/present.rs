//! Reading time presentation.
//!
//! Decides whether a piece of content gets a reading time block, formats the
//! block, and places it before or after the content.
//!
//! The block looks like:
//!
//! ```html
//! <p><strong>Reading Time:</strong> 3 min, 20 sec</p>
//! ```
//!
//! Every configured label is HTML-escaped before it is concatenated.

use serde::{Deserialize, Serialize};

use crate::estimate::{self, Duration};
use crate::settings::{Placement, Settings};

/// Per-request rendering context supplied by the host pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    /// The request displays a single item (not a list or archive).
    pub is_single_view: bool,
    /// The content is rendered inside the item loop rather than a side widget.
    pub in_the_loop: bool,
    /// The content belongs to the page's primary query.
    pub is_main_query: bool,
    /// Content type of the item being rendered (e.g. `post`, `page`).
    pub post_type: String,
}

impl RenderContext {
    /// Context for the main body of a single item of `post_type`.
    pub fn single<S: Into<String>>(post_type: S) -> Self {
        Self {
            is_single_view: true,
            in_the_loop: true,
            is_main_query: true,
            post_type: post_type.into(),
        }
    }

    /// Context for an item listed on an archive or index page.
    pub fn archive<S: Into<String>>(post_type: S) -> Self {
        Self {
            is_single_view: false,
            ..Self::single(post_type)
        }
    }

    /// The main single-item display, rendered inside the loop.
    pub const fn is_primary_content_view(&self) -> bool {
        self.is_single_view && self.in_the_loop
    }
}

/// Returns `true` if content rendered in `context` should get a reading time.
pub fn is_eligible(context: &RenderContext, settings: &Settings) -> bool {
    context.is_primary_content_view()
        && context.is_main_query
        && !settings.is_excluded(&context.post_type)
}

/// Format the duration with the configured unit labels. Not escaped.
///
/// - seconds-only mode: `"45 sec"`, `"125 sec"`
/// - otherwise, with leftover seconds: `"2 min, 5 sec"`, `"0 min, 45 sec"`
/// - otherwise: `"1 min"`
pub fn format_time_text(duration: &Duration, settings: &Settings) -> String {
    if settings.display_seconds {
        format!("{} {}", duration.total_seconds, settings.seconds_text)
    } else if duration.seconds > 0 {
        format!(
            "{} {}, {} {}",
            duration.minutes, settings.minutes_text, duration.seconds, settings.seconds_text
        )
    } else {
        format!("{} {}", duration.minutes, settings.minutes_text)
    }
}

/// Build the escaped paragraph shown to readers.
pub fn display_block(duration: &Duration, settings: &Settings) -> String {
    let label = escape(&settings.custom_text);
    let time_text = escape(&format_time_text(duration, settings));
    format!("<p><strong>{label}</strong> {time_text}</p>")
}

/// Inject the reading time into `content` according to `settings`.
///
/// Returns the content unchanged when the context is not eligible, when the
/// placement is manual, or when the stored placement is not recognized.
#[tracing::instrument(
    skip(content, settings),
    fields(content_len = content.len(), post_type = %context.post_type)
)]
pub fn render(content: &str, context: &RenderContext, settings: &Settings) -> String {
    if !is_eligible(context, settings) {
        tracing::trace!("not eligible, content unchanged");
        return content.to_string();
    }
    let duration = estimate::compute_duration(content, settings.effective_speed());
    place(content, &duration, context, settings)
}

/// Place a block for an already computed `duration` around `content`.
///
/// Same gate and placement rules as [`render`]. Used when the estimate must
/// come from text other than `content`, such as an article whose markers were
/// expanded in place.
pub fn place(
    content: &str,
    duration: &Duration,
    context: &RenderContext,
    settings: &Settings,
) -> String {
    if !is_eligible(context, settings) {
        return content.to_string();
    }

    let placement = &settings.placement;
    if !matches!(placement, Placement::Before | Placement::After) {
        tracing::trace!(%placement, "no automatic placement, content unchanged");
        return content.to_string();
    }

    let block = display_block(duration, settings);
    if *placement == Placement::Before {
        block + content
    } else {
        let mut out = String::with_capacity(content.len() + block.len());
        out.push_str(content);
        out.push_str(&block);
        out
    }
}

/// Produce the reading time block for a manual call from a template.
///
/// Behaves like [`render`] on empty content with placement forced on: returns
/// an empty string outside single-item views or for ineligible content, and
/// otherwise a zero-length estimate block whatever the placement setting is.
pub fn manual_invocation(context: &RenderContext, settings: &Settings) -> String {
    manual_block(&Duration::default(), context, settings)
}

/// Block for `duration` under the manual rules of [`manual_invocation`].
pub fn manual_block(duration: &Duration, context: &RenderContext, settings: &Settings) -> String {
    if !context.is_single_view || !is_eligible(context, settings) {
        return String::new();
    }
    display_block(duration, settings)
}

/// Escape a label for HTML output without double-encoding entities that are
/// already present.
fn escape(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    html_escape::encode_quoted_attribute(&decoded).into_owned()
}
