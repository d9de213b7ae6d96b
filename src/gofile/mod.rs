//! GoFile API 模块

pub mod auth;
pub mod contents;
pub mod error;
pub mod filter;
pub mod parser;
pub mod resolve;
pub mod types;

// 导出常用函数
pub use auth::{ensure_credentials, ensure_secondary_secret, ensure_token, Credentials};
pub use contents::{fetch_content, password_digest};
pub use error::ResolveError;
pub use filter::{sanitize_segment, ExclusionSet};
pub use parser::{extract_content_id, parse_root_ref};
pub use resolve::{convert_to_direct_links, resolve, ResolveOptions};
pub use types::{BranchFailure, ContentNode, FileEntry, Resolution};
