//! Content rendering pipeline.
//!
//! Named extension points ("hooks") hold filters that each transform the
//! content string in turn. Filters run in ascending priority; filters with the
//! same priority run in registration order. Registration happens once at
//! startup, after which the pipeline is only read.
//!
//! # Example
//! ```
//! use readtime_core::pipeline::{self, ContentPipeline, THE_CONTENT};
//! use readtime_core::{RenderContext, Settings};
//!
//! let mut pipeline = ContentPipeline::new();
//! pipeline::register_reading_time(&mut pipeline, Settings::default());
//!
//! let out = pipeline.apply(THE_CONTENT, "A short post.", &RenderContext::single("post"));
//! assert!(out.starts_with("<p><strong>Reading Time:</strong>"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::present::RenderContext;
use crate::settings::Settings;
use crate::shortcode;

/// Extension point run on every article body before display.
pub const THE_CONTENT: &str = "the_content";

/// Priority used when a filter has no ordering preference.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Name of the reading time filter.
pub const RENDER_FILTER: &str = "readtime::render";

/// A content transform attached to a hook.
pub type Filter = Box<dyn Fn(String, &RenderContext) -> String + Send + Sync>;

struct RegisteredFilter {
    name: String,
    priority: i32,
    filter: Filter,
}

/// Registry of hooks and their filters.
#[derive(Default)]
pub struct ContentPipeline {
    hooks: HashMap<String, Vec<RegisteredFilter>>,
}

impl fmt::Debug for ContentPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (hook, filters) in &self.hooks {
            let names: Vec<_> = filters.iter().map(|r| (r.priority, &r.name)).collect();
            map.entry(hook, &names);
        }
        map.finish()
    }
}

impl ContentPipeline {
    /// Create a pipeline with no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `filter` to `hook` under `name`.
    ///
    /// Registering a second filter with the same name on the same hook adds it
    /// again; use [`remove_filter`](Self::remove_filter) first to replace one.
    pub fn add_filter<F>(&mut self, hook: &str, name: &str, priority: i32, filter: F) -> &mut Self
    where
        F: Fn(String, &RenderContext) -> String + Send + Sync + 'static,
    {
        let filters = self.hooks.entry(hook.to_string()).or_default();
        // Insert after every filter with the same or lower priority.
        let at = filters.partition_point(|r| r.priority <= priority);
        filters.insert(
            at,
            RegisteredFilter {
                name: name.to_string(),
                priority,
                filter: Box::new(filter),
            },
        );
        tracing::debug!(hook, name, priority, "filter registered");
        self
    }

    /// Detach every filter named `name` from `hook`. Returns `true` if any was removed.
    pub fn remove_filter(&mut self, hook: &str, name: &str) -> bool {
        let Some(filters) = self.hooks.get_mut(hook) else {
            return false;
        };
        let before = filters.len();
        filters.retain(|r| r.name != name);
        before != filters.len()
    }

    /// Returns `true` if a filter named `name` is attached to `hook`.
    pub fn has_filter(&self, hook: &str, name: &str) -> bool {
        self.hooks
            .get(hook)
            .is_some_and(|filters| filters.iter().any(|r| r.name == name))
    }

    /// Names and priorities of the filters on `hook`, in run order.
    pub fn filters(&self, hook: &str) -> Vec<(&str, i32)> {
        self.hooks
            .get(hook)
            .map(|filters| {
                filters
                    .iter()
                    .map(|r| (r.name.as_str(), r.priority))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Run `content` through every filter on `hook`.
    ///
    /// A hook with no filters returns the content unchanged.
    #[tracing::instrument(skip(self, content, context), fields(content_len = content.len()))]
    pub fn apply(&self, hook: &str, content: &str, context: &RenderContext) -> String {
        let Some(filters) = self.hooks.get(hook) else {
            return content.to_string();
        };
        filters.iter().fold(content.to_string(), |acc, registered| {
            tracing::trace!(filter = %registered.name, "applying filter");
            (registered.filter)(acc, context)
        })
    }
}

/// Attach the reading time filter to [`THE_CONTENT`] at the default priority.
///
/// The filter expands `[reading_time]` markers and places the automatic block
/// from a single estimate of the marker-free content. It reads the `settings`
/// snapshot passed here.
pub fn register_reading_time(pipeline: &mut ContentPipeline, settings: Settings) {
    let settings = Arc::new(settings);
    pipeline.add_filter(
        THE_CONTENT,
        RENDER_FILTER,
        DEFAULT_PRIORITY,
        move |content, context| shortcode::render_with_markers(&content, context, &settings),
    );
}
