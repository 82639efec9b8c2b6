use std::fs;

use linguapedia_core::{ArticleRoute, RenderOptions};
use linguapedia_engine::{article_filename, ensure_output_dir, render_article_page, ArticleWriter};
use tempfile::TempDir;

fn sample_page() -> linguapedia_engine::ArticlePage {
    let route = ArticleRoute::new("en", "Ada_Lovelace").unwrap();
    render_article_page(&route, "# Ada\n\nFirst programmer.", &RenderOptions::default())
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn save_uses_deterministic_name_and_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = ArticleWriter::new(temp.path().to_path_buf());
    let page = sample_page();

    let first = writer.save(&page).unwrap();
    assert_eq!(
        first.file_name().unwrap().to_str().unwrap(),
        article_filename(&page.route)
    );
    assert!(fs::read_to_string(&first).unwrap().contains("First programmer."));

    let second = writer.write(first.file_name().unwrap().to_str().unwrap(), "replaced").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "replaced");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_when_target_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = ArticleWriter::new(file_path.clone());
    assert!(writer.save(&sample_page()).is_err());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}
