//! 文件名过滤与清理

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::error::ResolveError;

/// 排除规则：shell 通配符（fnmatch 语义），匹配原始文件名
///
/// 区分大小写，`*` 也匹配 `/`；`{}`、`\\` 和未闭合的 `[` 都按字面匹配。
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    set: GlobSet,
}

impl ExclusionSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ResolveError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = GlobBuilder::new(&fnmatch_to_glob(pattern.as_ref()))
                .backslash_escape(false)
                .build()
                .map_err(|e| {
                    ResolveError::InvalidInput(format!("invalid exclude pattern: {}", e))
                })?;
            builder.add(glob);
        }

        let set = builder
            .build()
            .map_err(|e| ResolveError::InvalidInput(format!("invalid exclude patterns: {}", e)))?;

        Ok(Self { set })
    }

    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// fnmatch 模式 → globset 模式
///
/// - `{` `}` 写成 `[{]` `[}]`，不做分支展开
/// - 找不到 `]` 的 `[` 写成 `[[]`
/// - 字符类开头的 `^` 在 fnmatch 里是普通字符，挪到类的末尾
fn fnmatch_to_glob(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;

        match c {
            '{' | '}' => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            '[' => {
                // 与 fnmatch 相同：`!` 之后紧跟的 `]` 属于字符类本身
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    out.push_str("[[]");
                    continue;
                }

                let body: String = chars[i..j].iter().collect();
                i = j + 1;

                match body.strip_prefix('^') {
                    Some("") => out.push('^'),
                    Some(rest) => {
                        out.push('[');
                        out.push_str(rest);
                        out.push_str("^]");
                    }
                    None => {
                        out.push('[');
                        out.push_str(&body);
                        out.push(']');
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Windows / 常见文件系统都不允许出现在文件名里的字符
const INVALID_CHARS: &[char] = &['\0', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// 把一个名字清理成可以安全使用的单个路径段
///
/// - 删除非法字符和控制字符
/// - 去掉首尾空白、末尾的 `.`
/// - 保留设备名（CON、NUL…）后追加 `_`
/// - 长度不超过 255 字节；清理后为空时返回 `_`
pub fn sanitize_segment(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let cleaned: String = name
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c) && !c.is_control())
        .collect();

    let trimmed = cleaned
        .trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if trimmed.is_empty() {
        return "_".to_string();
    }

    let stem = trimmed.split('.').next().unwrap_or(trimmed);
    let mut out = if RESERVED_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(stem))
    {
        format!("{}_", trimmed)
    } else {
        trimmed.to_string()
    };

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out.truncate(take);
    }

    out
}

/// 百分号解码，非法 UTF-8 用替换字符代替
pub(crate) fn url_decode(s: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(s.as_bytes())).into_owned()
}
