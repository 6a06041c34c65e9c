//! Test fixtures: a content file and a config file in a temp directory.

use super::constants::*;
use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn content_records() -> Vec<Value> {
    let mut records = vec![
        json!({
            "path": "/plone/front-page",
            "title": "Welcome",
            "description": "The front page",
            "review_state": "published",
            "subject": ["Intro"],
            "creators": ["admin"],
            "uid": FRONT_PAGE_UID
        }),
        json!({
            "path": "/plone/news",
            "title": "News",
            "portal_type": "Folder",
            "review_state": "published",
            "uid": "uid-news"
        }),
        json!({
            "path": LAUNCH_PATH,
            "title": "Product launch",
            "description": "We shipped it",
            "portal_type": "News Item",
            "review_state": "published",
            "subject": ["Release", "News"],
            "creators": ["editor", "admin"],
            "uid": LAUNCH_UID
        }),
        json!({
            "path": "/plone/news/roadmap",
            "title": "Roadmap",
            "portal_type": "News Item",
            "review_state": "private",
            "subject": ["Planning"],
            "creators": ["editor"],
            "uid": "uid-roadmap"
        }),
        json!({
            "path": "/plone/events",
            "title": "Events",
            "portal_type": "Folder",
            "uid": "uid-events"
        }),
    ];
    records.extend((1..=PRESS_RELEASE_COUNT).map(|i| {
        json!({
            "path": format!("/plone/news/press/release-{:02}", i),
            "title": format!("Press release {:02}", i),
            "portal_type": "News Item",
            "review_state": "published",
            "subject": ["Press"],
            "creators": ["newsroom"],
            "uid": format!("uid-press-{:02}", i)
        })
    }));
    records.push(json!({
        "path": "/plone/events/summer-party",
        "title": "Summer party",
        "portal_type": "Event",
        "subject": ["Fun"],
        "uid": "uid-summer-party"
    }));
    records
}

const USERS_TOML: &str = r#"
[[users]]
user_id = "editor"
token = "editor-token"
fullname = "Edith Editor"
email = "editor@example.org"
grants = [
    { permission = "View" },
    { permission = "Modify portal content" },
]

[[users]]
user_id = "newsroom"
token = "newsroom-token"
grants = [
    { permission = "View" },
    { permission = "Modify portal content", scope = "/plone/news" },
]

[[users]]
user_id = "viewer"
token = "viewer-token"
grants = [{ permission = "View" }]
"#;

/// Writes the content file and a config file pointing at it.
///
/// `extra_toml` is placed before the `[[users]]` entries, so it may hold
/// top-level keys followed by tables.
///
/// Returns (temp_dir, config_path). Keep temp_dir alive for the test duration.
pub fn create_test_site(extra_toml: &str) -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;

    let content_path = temp_dir.path().join("content.json");
    fs::write(
        &content_path,
        serde_json::to_string_pretty(&content_records())?,
    )?;

    let config_path = temp_dir.path().join("config.toml");
    let config = format!(
        "site_root = \"{}\"\nsite_url = \"{}\"\ncontent_file = {:?}\n{}\n{}",
        SITE_ROOT,
        SITE_URL,
        content_path.to_string_lossy(),
        extra_toml,
        USERS_TOML
    );
    fs::write(&config_path, config)?;

    Ok((temp_dir, config_path))
}
