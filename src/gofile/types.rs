//! 数据类型

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use super::error::ResolveError;

/// 一个可直接下载的文件：直链 + 本地保存路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    direct_link: String,
    destination: PathBuf,
}

impl FileEntry {
    pub(crate) fn new(direct_link: String, destination: PathBuf) -> Self {
        Self {
            direct_link,
            destination,
        }
    }

    pub fn direct_link(&self) -> &str {
        &self.direct_link
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

impl std::fmt::Display for FileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.destination.display(), self.direct_link)
    }
}

/// 某个节点解析失败的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    /// 根链接本身无效时为 None
    pub content_id: Option<String>,
    pub error: ResolveError,
}

/// 一次解析的结果：成功拿到的文件 + 失败的分支
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub files: Vec<FileEntry>,
    pub failures: Vec<BranchFailure>,
}

impl Resolution {
    pub(crate) fn fail(&mut self, content_id: Option<&str>, error: ResolveError) {
        self.failures.push(BranchFailure {
            content_id: content_id.map(str::to_string),
            error,
        });
    }

    /// 所有分支都解析成功（文件数可能为 0）
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// 认证失败时整次解析都没有意义，返回对应的错误
    pub fn auth_failure(&self) -> Option<&ResolveError> {
        self.failures.iter().map(|f| &f.error).find(|e| e.is_auth())
    }

    pub fn direct_links(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(FileEntry::direct_link)
    }
}

/// `{status, data}` 外层结构，data 在确认 status 之后再解析
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

pub(crate) const FOLDER: &str = "folder";
pub(crate) const PASSWORD_OK: &str = "passwordOk";

/// 远端内容节点（文件或文件夹）
#[derive(Debug, Clone, Deserialize)]
pub struct ContentNode {
    /// "folder" 或文件类型；密码错误时接口可能不返回
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    /// 接口不返回时视为 passwordOk
    #[serde(rename = "passwordStatus", default = "default_password_status")]
    pub password_status: String,
    #[serde(default)]
    pub link: Option<String>,
    /// 子节点，保持接口返回的顺序
    #[serde(default, deserialize_with = "ordered_children")]
    pub children: Vec<(String, ContentNode)>,
}

impl ContentNode {
    pub fn is_folder(&self) -> bool {
        self.kind == FOLDER
    }

    pub fn password_ok(&self) -> bool {
        self.password_status == PASSWORD_OK
    }
}

fn default_password_status() -> String {
    PASSWORD_OK.to_string()
}

/// 自定义反序列化：children 是 `{id: node}` 的对象，按出现顺序展开成列表
fn ordered_children<'de, D>(deserializer: D) -> Result<Vec<(String, ContentNode)>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let map = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
    map.unwrap_or_default()
        .into_iter()
        .map(|(id, value)| {
            serde_json::from_value(value)
                .map(|node| (id, node))
                .map_err(Error::custom)
        })
        .collect()
}
