//! Manual insertion marker.
//!
//! Authors place `[reading_time]` in an article to choose exactly where the
//! reading time block appears. Markers expand under every placement setting,
//! including `manual`, and share the estimate of the automatic block.
//!
//! Accepted forms:
//! - `[reading_time]`
//! - `[reading_time /]`, `[reading_time/]`
//! - `[[reading_time]]`, which is escaped and rendered literally as `[reading_time]`

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::estimate::{self, Duration};
use crate::present::{self, RenderContext};
use crate::settings::Settings;

/// Name of the manual insertion marker.
pub const SHORTCODE_TAG: &str = "reading_time";

/// Regex for the marker, capturing optional escape brackets on either side.
static SHORTCODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(\[?)\[{SHORTCODE_TAG}\s*/?\](\]?)")).expect("valid regex")
});

/// Returns `true` if `content` contains a marker (escaped or not).
pub fn has_shortcode(content: &str) -> bool {
    SHORTCODE_PATTERN.is_match(content)
}

/// Replace every marker in `content` with the reading time block.
///
/// The estimate covers the whole of `content` with markers removed. Outside
/// single-item views, or for ineligible content, markers expand to nothing.
/// Automatic placement is not applied; see [`render_with_markers`].
#[tracing::instrument(skip(content, settings), fields(content_len = content.len()))]
pub fn expand_shortcodes(content: &str, context: &RenderContext, settings: &Settings) -> String {
    if !has_shortcode(content) {
        return content.to_string();
    }
    let duration = marker_free_duration(content, settings);
    expand_with(content, &duration, context, settings)
}

/// Expand markers and apply the automatic placement with one estimate.
///
/// The duration is computed once from `content` with markers removed, so the
/// automatic block and every expanded marker show the same time.
#[tracing::instrument(skip(content, settings), fields(content_len = content.len()))]
pub fn render_with_markers(content: &str, context: &RenderContext, settings: &Settings) -> String {
    if !has_shortcode(content) {
        return present::render(content, context, settings);
    }
    let duration = marker_free_duration(content, settings);
    let expanded = expand_with(content, &duration, context, settings);
    present::place(&expanded, &duration, context, settings)
}

fn marker_free_duration(content: &str, settings: &Settings) -> Duration {
    estimate::compute_duration(&strip_shortcodes(content), settings.effective_speed())
}

fn expand_with(
    content: &str,
    duration: &Duration,
    context: &RenderContext,
    settings: &Settings,
) -> String {
    let block = present::manual_block(duration, context, settings);
    tracing::debug!(
        markers = SHORTCODE_PATTERN.find_iter(content).count(),
        "expanding reading time markers"
    );
    replace_markers(content, &block).into_owned()
}

/// Remove every marker from `content`. Escaped markers become literal text.
pub fn strip_shortcodes(content: &str) -> String {
    replace_markers(content, "").into_owned()
}

fn replace_markers<'a>(content: &'a str, replacement: &str) -> Cow<'a, str> {
    SHORTCODE_PATTERN.replace_all(content, |caps: &Captures<'_>| {
        let (open, close) = (&caps[1], &caps[2]);
        if open == "[" && close == "]" {
            // Escaped marker: drop the outer brackets only.
            let whole = &caps[0];
            whole[1..whole.len() - 1].to_string()
        } else {
            format!("{open}{replacement}{close}")
        }
    })
}
