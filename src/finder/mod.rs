//! 文件查找模块
//!
//! 这个模块提供了目录树遍历、条目过滤以及结果输出功能。
//! 遍历是单线程、深度优先的，每个条目只读取一次元数据。

pub mod chain;
pub mod entry;
pub mod filter;
pub mod fs;
pub mod identity;
pub mod options;
pub mod printer;
pub mod walker;

use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::errors::FindResult;

pub use self::chain::{Action, Request, RequestChain};
pub use self::entry::{EntryKind, EntryMetadata};
pub use self::filter::FileFilter;
pub use self::fs::{FileSystem, OsFileSystem};
pub use self::identity::{IdentityResolver, SystemIdentity};
pub use self::options::{ChainMode, FindOptions};
pub use self::walker::FileWalker;

/// 文件查找器
///
/// 组合查找选项、文件系统和用户数据库，对目录树执行请求链。
pub struct Finder<'a> {
    options: FindOptions,
    fs: &'a dyn FileSystem,
    identity: &'a dyn IdentityResolver,
}

impl Finder<'static> {
    /// 创建使用真实文件系统和系统用户数据库的查找器
    pub fn new(options: FindOptions) -> Self {
        Self {
            options,
            fs: &OsFileSystem,
            identity: &SystemIdentity,
        }
    }
}

impl<'a> Finder<'a> {
    /// 替换文件系统
    pub fn with_file_system(self, fs: &'a dyn FileSystem) -> Self {
        Self { fs, ..self }
    }

    /// 替换用户和组的解析方式
    pub fn with_identity(self, identity: &'a dyn IdentityResolver) -> Self {
        Self { identity, ..self }
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    /// 从 `root` 开始遍历，把结果写入 `out`
    pub fn find<W: Write>(&self, root: &Path, chain: &RequestChain, out: W) -> FindResult<()> {
        info!("Starting search in {}", root.display());
        debug!("Request chain: {}", chain.describe());

        let mut walker = FileWalker::new(chain, &self.options, self.fs, self.identity, out);
        walker.walk(root)
    }
}
