//! 解析过程中的错误类型

use thiserror::Error;

/// 解析一个内容节点时可能出现的失败。
///
/// 解析器不会把这些错误抛出公共边界，而是记录为 [`BranchFailure`](super::BranchFailure)。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// token 或 wt 获取失败，状态保持未设置，下次调用会重试
    #[error("认证失败: {0}")]
    Auth(String),

    #[error("请求失败: {0}")]
    Transport(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    /// 密码错误或缺少密码
    #[error("密码校验失败: passwordStatus={0}")]
    Password(String),

    /// 接口返回的 status 不是 "ok"
    #[error("接口返回异常状态: {0}")]
    Remote(String),

    #[error("文件缺少下载链接: {0}")]
    MissingLink(String),

    #[error("目录层级超过上限 {0}")]
    DepthExceeded(usize),
}

impl ResolveError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ResolveError::Auth(_))
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(e: reqwest::Error) -> Self {
        ResolveError::Transport(e.to_string())
    }
}
