use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations that can produce FindError
pub type FindResult<T> = Result<T, FindError>;

/// myfind 的自定义错误类型
///
/// 除了权限不足（在遍历过程中就地报告并跳过）以外，所有错误都是致命的，
/// 会一直传播到 `main` 并以非零状态退出。
#[derive(Debug, Error)]
pub enum FindError {
    /// 未知的命令行参数
    #[error("{0} is not a valid command")]
    UnknownOption(String),

    /// 需要参数值的选项缺少参数
    #[error("no argument provided for {0}")]
    MissingValue(String),

    /// 多余的位置参数（路径只能出现在第一个位置）
    #[error("{0} is not a valid command")]
    UnexpectedArgument(String),

    /// 无效的文件类型
    #[error("type {0:?} does not exist")]
    InvalidFileType(String),

    /// 起始路径本身超过最大长度
    #[error("start path is too long: {}", .0.display())]
    RootPathTooLong(PathBuf),

    /// 拼接后的路径超过最大长度
    #[error("maximum path length exceeded: {}", .0.display())]
    PathTooLong(PathBuf),

    /// 读取元数据失败
    #[error("stat(\"{}\") failed", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 打开目录失败
    #[error("opendir({}) failed", path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 读取目录项失败
    #[error("readdir({}) failed", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 数字形式的用户 ID 无法转换（包括字面值 0）
    #[error("failed converting user ID {0:?}")]
    InvalidUserId(String),

    /// 用户名在用户数据库中不存在
    #[error("user {0:?} does not exist")]
    UnknownUser(String),

    /// 写入标准输出失败
    #[error("failed writing output")]
    Output(#[from] io::Error),
}

impl FindError {
    /// Whether the error was raised while building the request chain,
    /// before any traversal started.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            FindError::UnknownOption(_)
                | FindError::MissingValue(_)
                | FindError::UnexpectedArgument(_)
                | FindError::InvalidFileType(_)
                | FindError::RootPathTooLong(_)
        )
    }
}
