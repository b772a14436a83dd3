//! 文件系统访问
//!
//! 遍历引擎只通过 [`FileSystem`] 读取元数据和目录内容，
//! 这样测试可以用内存中的目录树模拟权限错误和设备文件。

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use super::entry::EntryMetadata;

/// 逐项产出目录项名称的迭代器
pub type DirNames<'a> = Box<dyn Iterator<Item = io::Result<OsString>> + 'a>;

/// 元数据和目录列表的提供者
pub trait FileSystem {
    /// 读取路径本身的元数据（不跟随符号链接）
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata>;

    /// 打开目录并逐项返回其中的名称
    ///
    /// 迭代器被丢弃时目录句柄随之关闭。
    fn read_dir(&self, path: &Path) -> io::Result<DirNames<'_>>;
}

/// 基于操作系统的文件系统实现
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn metadata(&self, path: &Path) -> io::Result<EntryMetadata> {
        fs::symlink_metadata(path).map(|metadata| EntryMetadata::from(&metadata))
    }

    fn read_dir(&self, path: &Path) -> io::Result<DirNames<'_>> {
        let entries = fs::read_dir(path)?;
        Ok(Box::new(entries.map(|entry| entry.map(|entry| entry.file_name()))))
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryFileSystem;
