use clap::{value_parser, Arg, ArgAction, Command};
use linguapedia_core::{
    ArticleRoute, DEFAULT_MAX_TRANSLATIONS, MAX_TRANSLATIONS_LIMIT, RECENT_ARTICLES,
};
use url::Url;

fn article_arg() -> Arg {
    Arg::new("article")
        .required(true)
        .value_name("ARTICLE")
        .help("Article as `lang/name`, `/article/lang/name`, or a full article URL")
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Do not ask for confirmation")
}

fn out_arg() -> Arg {
    Arg::new("out")
        .long("out")
        .value_name("DIR")
        .help("Directory for rendered article pages (defaults to the configured output_dir)")
}

fn slug_ids_arg() -> Arg {
    Arg::new("slug-ids")
        .long("slug-ids")
        .action(ArgAction::SetTrue)
        .help("Use lowercased, hyphenated heading ids instead of the heading text")
}

fn watch_flag() -> Arg {
    Arg::new("watch")
        .long("watch")
        .action(ArgAction::SetTrue)
        .help("Follow the synthesis job until it finishes")
}

pub fn build() -> Command {
    Command::new("linguapedia")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Client for the Linguapedia multilingual article synthesis backend")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .help("RON configuration file (defaults to ./linguapedia.ron when present)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .value_name("URL")
                .help("Backend base URL, overriding the configuration"),
        )
        .subcommand(
            Command::new("watch")
                .about("Poll a synthesis job and show its progress until it finishes")
                .arg(article_arg())
                .arg(out_arg().help("Also render the finished article into DIR"))
                .arg(slug_ids_arg()),
        )
        .subcommand(
            Command::new("search")
                .about("Submit an article title for synthesis")
                .arg(
                    Arg::new("title")
                        .required(true)
                        .value_name("TITLE")
                        .help("Article title to look up"),
                )
                .arg(
                    Arg::new("language")
                        .long("language")
                        .short('l')
                        .value_name("CODE")
                        .help("Target language code (defaults to the configured default_language)"),
                )
                .arg(
                    Arg::new("max-translations")
                        .long("max-translations")
                        .short('n')
                        .value_name("N")
                        .value_parser(value_parser!(u32))
                        .help(format!(
                            "Source languages to translate, 1-{MAX_TRANSLATIONS_LIMIT} (default {DEFAULT_MAX_TRANSLATIONS})"
                        )),
                )
                .arg(watch_flag()),
        )
        .subcommand(
            Command::new("render")
                .about("Render an article's Markdown into a standalone HTML page")
                .arg(article_arg())
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_name("PATH")
                        .help("Render this local Markdown file instead of downloading the article"),
                )
                .arg(out_arg())
                .arg(slug_ids_arg()),
        )
        .subcommand(
            Command::new("regenerate")
                .about("Discard the cached article and synthesize it again")
                .arg(article_arg())
                .arg(yes_arg())
                .arg(watch_flag()),
        )
        .subcommand(
            Command::new("cache")
                .about("Inspect or clear the backend's article cache")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List cached articles, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_name("N")
                                .value_parser(value_parser!(usize))
                                .help("Show only the N newest articles"),
                        )
                        .arg(
                            Arg::new("recent")
                                .long("recent")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("limit")
                                .help(format!("Show only the {RECENT_ARTICLES} newest articles")),
                        ),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete every cached article")
                        .arg(yes_arg()),
                ),
        )
}

/// Accepts `lang/name`, an `/article/lang/name` path, or a full URL whose
/// path is an article path.
pub fn parse_article(raw: &str) -> Option<ArticleRoute> {
    let raw = raw.trim();
    if let Ok(url) = Url::parse(raw) {
        if url.cannot_be_a_base() {
            return None;
        }
        let segments: Vec<String> = url
            .path_segments()?
            .map(|segment| urlencoding::decode(segment).map(|decoded| decoded.into_owned()))
            .collect::<Result<_, _>>()
            .ok()?;
        return match segments.as_slice() {
            [prefix, language, name] if prefix == "article" => {
                ArticleRoute::new(language.as_str(), name.as_str())
            }
            _ => None,
        };
    }
    if raw.starts_with('/') {
        return ArticleRoute::parse(raw);
    }
    let (language, name) = raw.split_once('/')?;
    ArticleRoute::new(language, name)
}

#[cfg(test)]
mod tests {
    use super::{build, parse_article};

    #[test]
    fn command_definition_is_consistent() {
        build().debug_assert();
    }

    #[test]
    fn article_forms_are_accepted() {
        let expected = parse_article("en/Ada_Lovelace").unwrap();
        assert_eq!(expected.path(), "/article/en/Ada_Lovelace");
        assert_eq!(parse_article("/article/en/Ada_Lovelace"), Some(expected.clone()));
        assert_eq!(
            parse_article("http://127.0.0.1:5000/article/en/Ada_Lovelace"),
            Some(expected)
        );
    }

    #[test]
    fn url_segments_are_decoded() {
        let route = parse_article("http://localhost:5000/article/fr/%C3%89cole").unwrap();
        assert_eq!(route.name(), "École");
    }

    #[test]
    fn non_article_inputs_are_rejected() {
        assert_eq!(parse_article("Ada_Lovelace"), None);
        assert_eq!(parse_article("/wiki/Ada"), None);
        assert_eq!(parse_article("http://localhost:5000/search"), None);
        assert_eq!(parse_article("en/a/b"), None);
    }

    #[test]
    fn cache_list_takes_an_optional_limit() {
        let matches = build()
            .try_get_matches_from(["linguapedia", "cache", "list", "--limit", "3"])
            .unwrap();
        let (_, cache) = matches.subcommand().unwrap();
        let (_, list) = cache.subcommand().unwrap();
        assert_eq!(list.get_one::<usize>("limit"), Some(&3));
        assert!(!list.get_flag("recent"));

        let unlimited = build()
            .try_get_matches_from(["linguapedia", "cache", "list"])
            .unwrap();
        let (_, cache) = unlimited.subcommand().unwrap();
        let (_, list) = cache.subcommand().unwrap();
        assert_eq!(list.get_one::<usize>("limit"), None);

        assert!(build()
            .try_get_matches_from(["linguapedia", "cache", "list", "--recent", "--limit", "3"])
            .is_err());
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let matches = build()
            .try_get_matches_from([
                "linguapedia",
                "cache",
                "clear",
                "--yes",
                "--base-url",
                "http://backend:8080",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "cache");
        let (_, clear) = sub.subcommand().unwrap();
        assert!(clear.get_flag("yes"));
        assert_eq!(
            clear.get_one::<String>("base-url").map(String::as_str),
            Some("http://backend:8080")
        );
    }
}
