use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use clap::ArgMatches;
use linguapedia_core::{
    cache_listing_view, ArticleRoute, DestructiveAction, HeadingIds, RenderOptions,
    SearchRequest, StopReason, RECENT_ARTICLES,
};
use linguapedia_engine::{render_article_page, ArticleWriter, BackendClient, PollEvent, PollerHandle};
use linguapedia_logging::lp_info;
use tokio::runtime::Runtime;

use crate::cli::parse_article;
use crate::config::AppConfig;
use crate::logging;
use crate::terminal::prompt::confirm_action;
use crate::terminal::render::{render_cache_listing, render_status};

/// Parses global options, sets up logging, and runs the chosen subcommand.
pub fn run(matches: &ArgMatches) -> Result<()> {
    let leaf = leaf_matches(matches);
    let config_path = leaf.get_one::<String>("config").map(PathBuf::from);
    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(base_url) = leaf.get_one::<String>("base-url") {
        config.base_url = base_url.clone();
    }
    logging::initialize(config.log_destination, &config.log_level);
    lp_info!("Using backend {}", config.base_url);

    let session = Session::new(config)?;
    match matches.subcommand() {
        Some(("watch", args)) => {
            let route = article_from(args)?;
            let out = args.get_one::<String>("out").map(PathBuf::from);
            session.watch(&route, out.as_deref(), session.render_options(args))
        }
        Some(("search", args)) => session.search(args),
        Some(("render", args)) => {
            let route = article_from(args)?;
            let file = args.get_one::<String>("file").map(PathBuf::from);
            let out = session.output_dir(args);
            session.render(&route, file.as_deref(), &out, session.render_options(args))
        }
        Some(("regenerate", args)) => {
            let route = article_from(args)?;
            session.regenerate(&route, args.get_flag("yes"), args.get_flag("watch"))
        }
        Some(("cache", args)) => match args.subcommand() {
            Some(("list", list)) => {
                let limit = if list.get_flag("recent") {
                    Some(RECENT_ARTICLES)
                } else {
                    list.get_one::<usize>("limit").copied()
                };
                session.list_cache(limit)
            }
            Some(("clear", clear)) => session.clear_cache(clear.get_flag("yes")),
            _ => bail!("unknown cache command"),
        },
        _ => bail!("unknown command"),
    }
}

/// Global flags are read where they were given: the deepest subcommand sees them all.
fn leaf_matches(matches: &ArgMatches) -> &ArgMatches {
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        current = sub;
    }
    current
}

fn article_from(args: &ArgMatches) -> Result<ArticleRoute> {
    let raw = args
        .get_one::<String>("article")
        .ok_or_else(|| anyhow!("missing article"))?;
    parse_article(raw).ok_or_else(|| anyhow!("{raw:?} is not an article (expected lang/name)"))
}

struct Session {
    config: AppConfig,
    client: BackendClient,
    runtime: Runtime,
}

impl Session {
    fn new(config: AppConfig) -> Result<Self> {
        let client = BackendClient::new(&config.backend_settings())?;
        let runtime = Runtime::new().context("starting the async runtime")?;
        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    fn render_options(&self, args: &ArgMatches) -> RenderOptions {
        let mut options = self.config.render_options();
        if args.get_flag("slug-ids") {
            options.heading_ids = HeadingIds::Slugged;
        }
        options
    }

    fn output_dir(&self, args: &ArgMatches) -> PathBuf {
        args.get_one::<String>("out")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.output_dir.clone())
    }

    /// Follows the job until it stops, printing every view change.
    /// A finished article is rendered into `out` when one is given.
    fn watch(&self, route: &ArticleRoute, out: Option<&Path>, options: RenderOptions) -> Result<()> {
        let handle = PollerHandle::spawn(
            Arc::new(self.client.clone()),
            route.clone(),
            self.config.poll_policy(),
        )?;

        let mut reason = StopReason::Cancelled;
        for event in handle.events() {
            match event {
                PollEvent::View(view) => {
                    println!("-- {}", Local::now().format("%H:%M:%S"));
                    for line in render_status(&view, &self.config.base_url) {
                        println!("{line}");
                    }
                }
                PollEvent::Finished(stop) => reason = stop,
            }
        }

        match reason {
            StopReason::Completed => match out {
                Some(dir) => self.render(route, None, dir, options),
                None => Ok(()),
            },
            StopReason::Failed => bail!("synthesis of {route} failed"),
            StopReason::Cancelled => bail!("stopped watching {route}"),
        }
    }

    fn search(&self, args: &ArgMatches) -> Result<()> {
        let title = args
            .get_one::<String>("title")
            .ok_or_else(|| anyhow!("missing title"))?;
        let language = args
            .get_one::<String>("language")
            .unwrap_or(&self.config.default_language);
        let max_translations = args
            .get_one::<u32>("max-translations")
            .copied()
            .unwrap_or(self.config.max_translations);

        let request = SearchRequest::new(title, language, max_translations)?;
        let location = self.runtime.block_on(self.client.submit_search(&request))?;
        println!("{location}");

        if args.get_flag("watch") {
            let route = parse_article(&location)
                .ok_or_else(|| anyhow!("backend redirected to {location}, not an article page"))?;
            self.watch(&route, None, self.config.render_options())?;
        }
        Ok(())
    }

    fn render(
        &self,
        route: &ArticleRoute,
        file: Option<&Path>,
        out: &Path,
        options: RenderOptions,
    ) -> Result<()> {
        let markdown = match file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => self.runtime.block_on(self.client.download_article(route))?,
        };
        let page = render_article_page(route, &markdown, &options);
        if page.toc.is_hidden() {
            lp_info!("{} has too few headings for a table of contents", route);
        }
        let path = ArticleWriter::new(out.to_path_buf()).save(&page)?;
        println!("{}", path.display());
        Ok(())
    }

    fn regenerate(&self, route: &ArticleRoute, assume_yes: bool, watch: bool) -> Result<()> {
        let action = DestructiveAction::Regenerate(route.clone());
        if confirm_action(action, assume_yes, &mut io::stdin().lock(), &mut io::stdout())?.is_none() {
            println!("Cancelled.");
            return Ok(());
        }

        match self.runtime.block_on(self.client.regenerate(route))? {
            Some(target) => println!("Regeneration started: {target}"),
            None => println!("Regeneration started."),
        }
        if watch {
            self.watch(route, None, self.config.render_options())?;
        }
        Ok(())
    }

    fn list_cache(&self, limit: Option<usize>) -> Result<()> {
        let entries = self.runtime.block_on(self.client.list_cache())?;
        let mut listing = cache_listing_view(&entries);
        if let Some(limit) = limit {
            listing = listing.newest(limit);
        }
        for line in render_cache_listing(&listing) {
            println!("{line}");
        }
        Ok(())
    }

    fn clear_cache(&self, assume_yes: bool) -> Result<()> {
        let action = DestructiveAction::ClearCache;
        if confirm_action(action, assume_yes, &mut io::stdin().lock(), &mut io::stdout())?.is_none() {
            println!("Cancelled.");
            return Ok(());
        }
        self.runtime.block_on(self.client.clear_cache())?;
        lp_info!("Article cache cleared");
        println!("Cache cleared.");
        Ok(())
    }
}
