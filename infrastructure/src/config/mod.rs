//! Configuration for claude-web
//!
//! [`ClientConfig`] carries the base URL, session cookie, proxy, timeout and
//! completion defaults. [`ConfigLoader`] merges it from several sources,
//! highest priority first:
//!
//! 1. `CLAUDE_WEB_*` environment variables
//! 2. An explicitly given file
//! 3. Project root: `./claude-web.toml` or `./.claude-web.toml`
//! 4. Global: `<config dir>/claude-web/config.toml`
//! 5. Default values

mod client_config;
mod loader;

pub use client_config::{ClientConfig, ConfigIssue, DEFAULT_TIMEOUT_SECS};
pub use loader::{ConfigLoader, ENV_PREFIX};
