//! Render command: run a file through the content pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use serde::Serialize;
use tracing::{debug, instrument};

use readtime_core::{
    ContentPipeline, RenderContext, Settings, THE_CONTENT, register_reading_time,
};

use super::{open_store, read_input_file};

/// Arguments for the `render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Article body to render (HTML or plain text).
    pub file: Utf8PathBuf,

    /// Content type of the article.
    #[arg(long, default_value = "post")]
    pub post_type: String,

    /// Render as an item listed on an archive page instead of a single view.
    #[arg(long)]
    pub archive: bool,

    /// Render outside the item loop (e.g. a sidebar excerpt).
    #[arg(long)]
    pub outside_loop: bool,

    /// Render as part of a secondary query rather than the main one.
    #[arg(long)]
    pub secondary_query: bool,
}

impl RenderArgs {
    fn context(&self) -> RenderContext {
        RenderContext {
            is_single_view: !self.archive,
            in_the_loop: !self.outside_loop,
            is_main_query: !self.secondary_query,
            post_type: self.post_type.clone(),
        }
    }
}

#[derive(Serialize)]
struct RenderOutput<'a> {
    post_type: &'a str,
    changed: bool,
    content: String,
}

/// Render a file the way the content pipeline would display it.
#[instrument(name = "cmd_render", skip_all, fields(file = %args.file, post_type = %args.post_type))]
pub fn cmd_render(
    args: RenderArgs,
    global_json: bool,
    options_path: &Utf8Path,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let context = args.context();
    debug!(?context, "executing render command");

    let content = read_input_file(&args.file, max_input_bytes)?;
    let settings = Settings::load(&open_store(options_path)?);
    let rendered = render(&content, &context, settings);

    if global_json {
        let output = RenderOutput {
            post_type: &args.post_type,
            changed: rendered != content,
            content: rendered,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{rendered}");
        if !rendered.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}

fn render(content: &str, context: &RenderContext, settings: Settings) -> String {
    let mut pipeline = ContentPipeline::new();
    register_reading_time(&mut pipeline, settings);
    pipeline.apply(THE_CONTENT, content, context)
}
