//! Linguapedia engine: backend client, status poll loop and article page assembly.
mod client;
mod filename;
mod page;
mod persist;
mod poller;
mod toc;
mod types;

pub use client::{BackendClient, BackendSettings, StatusSource};
pub use filename::article_filename;
pub use page::{render_article_page, ArticlePage};
pub use persist::{ensure_output_dir, ArticleWriter, PersistError};
pub use poller::{run_poll_loop, ChannelViewSink, PollerHandle, ViewSink};
pub use toc::{build_toc, AnnotatedArticle, TocEntry, TocPanel, TOC_INDENT_PX, TOC_MIN_HEADINGS};
pub use types::{FailureKind, FetchError, PollEvent};

pub use tokio_util::sync::CancellationToken;
