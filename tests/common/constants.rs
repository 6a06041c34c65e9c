//! Shared constants for end-to-end tests
//!
//! When test data changes (tokens, content paths, counts), update only this file.

// ============================================================================
// Site
// ============================================================================

/// Physical path of the test site
pub const SITE_ROOT: &str = "/plone";

/// Public URL the test site is served under
pub const SITE_URL: &str = "http://plone.test";

// ============================================================================
// Vocabulary Names
// ============================================================================

pub const CATALOG: &str = "plone.app.vocabularies.Catalog";
pub const KEYWORDS: &str = "plone.app.vocabularies.Keywords";
pub const USERS: &str = "plone.app.vocabularies.Users";

// ============================================================================
// Test Users
// ============================================================================

/// Holds View and Modify portal content everywhere
pub const EDITOR_USER: &str = "editor";
pub const EDITOR_TOKEN: &str = "editor-token";
pub const EDITOR_FULLNAME: &str = "Edith Editor";

/// Holds Modify portal content only below /plone/news
pub const NEWSROOM_USER: &str = "newsroom";
pub const NEWSROOM_TOKEN: &str = "newsroom-token";

/// Holds View only
pub const VIEWER_USER: &str = "viewer";
pub const VIEWER_TOKEN: &str = "viewer-token";

// ============================================================================
// Test Content
// ============================================================================

/// Number of generated "Press release NN" items below /plone/news/press
pub const PRESS_RELEASE_COUNT: usize = 20;

/// Every record in the test content file
pub const CONTENT_RECORD_COUNT: usize = PRESS_RELEASE_COUNT + 6;

/// Records at or below /plone/news
pub const NEWS_RECORD_COUNT: usize = PRESS_RELEASE_COUNT + 3;

pub const FRONT_PAGE_UID: &str = "uid-front-page";
pub const LAUNCH_UID: &str = "uid-launch";
pub const LAUNCH_PATH: &str = "/plone/news/launch";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
