//! 目录树展开：分享链接 / content id → 文件直链列表

use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::auth::ensure_credentials;
use super::contents::{fetch_content, password_digest};
use super::error::ResolveError;
use super::filter::{sanitize_segment, url_decode, ExclusionSet};
use super::parser::parse_root_ref;
use super::types::{ContentNode, FileEntry, Resolution};
use crate::AppState;

/// 解析参数
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub password: Option<String>,
    /// shell 通配符，匹配到的文件名直接跳过
    pub excludes: Vec<String>,
    /// 保存路径的根目录
    pub dest_root: PathBuf,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            password: None,
            excludes: Vec::new(),
            dest_root: PathBuf::from("."),
        }
    }
}

/// 待处理的工作项。出栈顺序与递归的先序遍历一致。
enum Task {
    Fetch {
        content_id: String,
        dir: PathBuf,
        depth: usize,
    },
    Emit(FileEntry),
}

/// 展开 `root_ref`（分享链接或 content id）下的所有文件
///
/// 不会返回错误：无效输入、认证失败、请求失败、密码错误都记录在
/// [`Resolution::failures`] 里，其它分支的结果照常保留。
pub async fn resolve(state: &AppState, root_ref: &str, opts: &ResolveOptions) -> Resolution {
    let mut res = Resolution::default();

    let root_id = match parse_root_ref(root_ref, &state.config.gofile.site_base) {
        Ok(id) => id,
        Err(e) => {
            error!("❌ {}", e);
            res.fail(None, e);
            return res;
        }
    };

    let excludes = match ExclusionSet::new(&opts.excludes) {
        Ok(set) => set,
        Err(e) => {
            error!("❌ {}", e);
            res.fail(Some(&root_id), e);
            return res;
        }
    };

    let creds = match ensure_credentials(state).await {
        Ok(creds) => creds,
        Err(e) => {
            res.fail(Some(&root_id), e);
            return res;
        }
    };

    let password_hash = password_digest(opts.password.as_deref());
    let max_depth = state.config.gofile.max_depth;

    info!("📥 开始解析: content_id={}", root_id);

    let mut stack = vec![Task::Fetch {
        content_id: root_id.clone(),
        dir: opts.dest_root.clone(),
        depth: 0,
    }];

    while let Some(task) = stack.pop() {
        let (content_id, dir, depth) = match task {
            Task::Emit(entry) => {
                res.files.push(entry);
                continue;
            }
            Task::Fetch {
                content_id,
                dir,
                depth,
            } => (content_id, dir, depth),
        };

        if depth > max_depth {
            warn!("⚠️ 目录层级过深，跳过: content_id={}", content_id);
            res.fail(Some(&content_id), ResolveError::DepthExceeded(max_depth));
            continue;
        }

        let node = match fetch_content(state, &creds, &content_id, &password_hash).await {
            Ok(node) => node,
            Err(e) => {
                error!("❌ 获取内容失败 content_id={}: {}", content_id, e);
                res.fail(Some(&content_id), e);
                continue;
            }
        };

        if !node.password_ok() {
            error!(
                "🔐 密码无效 content_id={}: {}",
                content_id, node.password_status
            );
            res.fail(Some(&content_id), ResolveError::Password(node.password_status));
            continue;
        }

        if !node.is_folder() {
            if let Some(entry) = file_entry(&content_id, &node, &dir, &excludes, &mut res) {
                res.files.push(entry);
            }
            continue;
        }

        let dir = dir.join(sanitize_segment(&url_decode(&node.name)));
        let mut pending = Vec::with_capacity(node.children.len());

        for (child_id, child) in &node.children {
            if child.is_folder() {
                pending.push(Task::Fetch {
                    content_id: child_id.clone(),
                    dir: dir.clone(),
                    depth: depth + 1,
                });
            } else if let Some(entry) = file_entry(child_id, child, &dir, &excludes, &mut res) {
                pending.push(Task::Emit(entry));
            }
        }

        stack.extend(pending.into_iter().rev());
    }

    info!(
        "✅ 解析完成 content_id={}: {} 个文件, {} 个失败分支",
        root_id,
        res.files.len(),
        res.failures.len()
    );
    res
}

/// 文件节点 → FileEntry；被排除或缺少链接时返回 None
fn file_entry(
    content_id: &str,
    node: &ContentNode,
    dir: &Path,
    excludes: &ExclusionSet,
    res: &mut Resolution,
) -> Option<FileEntry> {
    if excludes.is_excluded(&node.name) {
        return None;
    }

    let Some(link) = node.link.as_deref() else {
        warn!("⚠️ 文件没有下载链接: {}", node.name);
        res.fail(
            Some(content_id),
            ResolveError::MissingLink(node.name.clone()),
        );
        return None;
    };

    Some(FileEntry::new(
        url_decode(link),
        dir.join(sanitize_segment(&url_decode(&node.name))),
    ))
}

/// 分享链接 → 最多 `max_results` 个直链（遍历顺序）
///
/// 只有认证失败会返回错误，其它失败只会让结果变少或为空。
pub async fn convert_to_direct_links(
    state: &AppState,
    url: &str,
    password: Option<&str>,
    max_results: usize,
) -> Result<Vec<String>, ResolveError> {
    let opts = ResolveOptions {
        password: password.map(str::to_string),
        ..ResolveOptions::default()
    };

    let res = resolve(state, url, &opts).await;
    if let Some(e) = res.auth_failure() {
        return Err(e.clone());
    }

    Ok(res
        .direct_links()
        .take(max_results)
        .map(str::to_string)
        .collect())
}
