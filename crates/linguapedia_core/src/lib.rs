//! Linguapedia core: pure poll state machine, view-models, and the article renderer.
mod cache;
mod confirm;
mod effect;
mod html;
mod inline;
mod markdown;
mod msg;
mod route;
mod search;
mod state;
mod status;
mod steps;
mod update;
mod view_model;

pub use cache::{
    cache_listing_view, format_size, CacheEntry, CacheListingView, CacheRowView, RECENT_ARTICLES,
};
pub use confirm::{is_affirmative, DestructiveAction};
pub use effect::Effect;
pub use html::{escape_html, push_escaped};
pub use inline::INTERNAL_LINK_CLASS;
pub use markdown::{
    render_markdown, render_markdown_with, scan, slugify, Block, HeadingIds, ListKind,
    RenderOptions,
};
pub use msg::Msg;
pub use route::{ArticleRoute, ARTICLE_PREFIX};
pub use search::{
    find_language, Language, SearchError, SearchRequest, DEFAULT_MAX_TRANSLATIONS,
    MAX_TRANSLATIONS_LIMIT, SUPPORTED_LANGUAGES,
};
pub use state::{PollPhase, PollPolicy, PollState, StopReason, FAILURE_DELAY, SUCCESS_DELAY};
pub use status::{JobStatus, StatusReport, Verdict, PROGRESS_COMPLETE};
pub use steps::{active_step_count, ProgressStep, PROGRESS_STEPS};
pub use update::update;
pub use view_model::{StatusView, StepView};
