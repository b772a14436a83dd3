//! 文件系统遍历功能
//!
//! 本模块按深度优先、先父后子的顺序遍历目录树，
//! 对每个条目读取一次元数据并执行请求链。

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::chain::{Request, RequestChain};
use super::entry::EntryMetadata;
use super::filter::{EntryContext, FileFilter};
use super::fs::FileSystem;
use super::identity::IdentityResolver;
use super::options::{ChainMode, FindOptions};
use super::printer::Printer;
use crate::errors::{FindError, FindResult};

/// 使用给定选项处理文件系统遍历
pub struct FileWalker<'a, W: Write> {
    chain: &'a RequestChain,
    options: &'a FindOptions,
    fs: &'a dyn FileSystem,
    identity: &'a dyn IdentityResolver,
    printer: Printer<'a, W>,
}

impl<'a, W: Write> FileWalker<'a, W> {
    /// 创建新的 FileWalker
    pub fn new(
        chain: &'a RequestChain,
        options: &'a FindOptions,
        fs: &'a dyn FileSystem,
        identity: &'a dyn IdentityResolver,
        out: W,
    ) -> Self {
        Self {
            chain,
            options,
            fs,
            identity,
            printer: Printer::new(out, identity, options.utc_times),
        }
    }

    /// 从给定路径开始遍历，完成后刷新输出
    pub fn walk(&mut self, root: &Path) -> FindResult<()> {
        let result = self.visit(root);
        let flushed = self.printer.flush();
        result.and(flushed)
    }

    /// 处理单个条目：读取元数据、执行请求链，必要时进入目录
    fn visit(&mut self, path: &Path) -> FindResult<()> {
        let metadata = match self.fs.metadata(path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                debug!("跳过无法读取元数据的条目: {}", path.display());
                return self
                    .printer
                    .notice(format_args!("stat(\"{}\") failed.", path.display()));
            }
            Err(source) => {
                return Err(FindError::Metadata {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let descend = self.evaluate(path, &metadata)?;

        if descend && metadata.is_dir() {
            self.descend(path)?;
        }

        Ok(())
    }

    /// 对条目执行请求链，返回是否应进入该目录
    fn evaluate(&mut self, path: &Path, metadata: &EntryMetadata) -> FindResult<bool> {
        let chain = self.chain;
        let context = EntryContext {
            path,
            metadata,
            identity: self.identity,
        };

        match self.options.chain_mode {
            ChainMode::ShortCircuit => {
                for request in chain {
                    match request {
                        Request::Filter(filter) => {
                            if !filter.matches(&context)? {
                                break;
                            }
                        }
                        Request::Action(action) => self.printer.dispatch(*action, path, metadata)?,
                    }
                }
                Ok(true)
            }
            ChainMode::Exhaustive => {
                let mut matched = true;
                for request in chain {
                    match request {
                        Request::Filter(filter) => matched &= filter.matches(&context)?,
                        Request::Action(action) => self.printer.dispatch(*action, path, metadata)?,
                    }
                }
                Ok(matched)
            }
        }
    }

    /// 逐项读取目录并访问每个子项
    ///
    /// 目录句柄在函数返回时释放，包括提前返回的情况。
    fn descend(&mut self, dir: &Path) -> FindResult<()> {
        let fs = self.fs;
        let names = match fs.read_dir(dir) {
            Ok(names) => names,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                debug!("跳过无法打开的目录: {}", dir.display());
                return self
                    .printer
                    .notice(format_args!("opendir({}) failed.", dir.display()));
            }
            Err(source) => {
                return Err(FindError::OpenDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        };

        debug!("进入目录: {}", dir.display());

        for name in names {
            let name = match name {
                Ok(name) => name,
                Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                    debug!("目录读取中断: {}", dir.display());
                    return self
                        .printer
                        .notice(format_args!("readdir({}) failed.", dir.display()));
                }
                Err(source) => {
                    return Err(FindError::ReadDir {
                        path: dir.to_path_buf(),
                        source,
                    })
                }
            };

            if name == "." || name == ".." {
                continue;
            }

            let child = self.child_path(dir, &name)?;
            self.visit(&child)?;
        }

        Ok(())
    }

    /// 拼接 `dir/name`，长度达到上限时报错而不是截断
    fn child_path(&self, dir: &Path, name: &OsStr) -> FindResult<PathBuf> {
        let mut child = OsString::with_capacity(dir.as_os_str().len() + 1 + name.len());
        child.push(dir.as_os_str());
        child.push("/");
        child.push(name);

        if child.len() >= self.options.max_path_length {
            return Err(FindError::PathTooLong(PathBuf::from(child)));
        }

        Ok(PathBuf::from(child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::chain::Action;
    use crate::finder::entry::EntryKind;
    use crate::finder::filter::{Filter, NameFilter, TypeFilter, UserFilter};
    use crate::finder::fs::MemoryFileSystem;
    use crate::finder::identity::FixedIdentity;

    fn create_test_structure() -> MemoryFileSystem {
        MemoryFileSystem::with_root(".")
            .file("./file1.txt")
            .dir("./dir1")
            .file("./dir1/file2.txt")
            .dir("./dir1/empty")
            .file("./notes.md")
    }

    fn run(fs: &MemoryFileSystem, chain: &RequestChain, options: &FindOptions) -> (FindResult<()>, String) {
        let identity = FixedIdentity::default();
        let mut out = Vec::new();
        let result = FileWalker::new(chain, options, fs, &identity, &mut out).walk(Path::new("."));
        (result, String::from_utf8(out).unwrap())
    }

    fn name(pattern: &str) -> Request {
        Filter::Name(NameFilter::new(pattern)).into()
    }

    #[test]
    fn test_walk_prints_preorder() {
        let fs = create_test_structure();
        let (result, output) = run(&fs, &RequestChain::default(), &FindOptions::new());

        assert!(result.is_ok());
        assert_eq!(
            output,
            ".\n./file1.txt\n./dir1\n./dir1/file2.txt\n./dir1/empty\n./notes.md\n"
        );
    }

    #[test]
    fn test_walk_is_repeatable() {
        let fs = create_test_structure();
        let chain = RequestChain::default();
        let (_, first) = run(&fs, &chain, &FindOptions::new());
        let (_, second) = run(&fs, &chain, &FindOptions::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_name_filter_reaches_nested_entries() {
        let fs = create_test_structure().file("./a.txt.bak");
        let chain = RequestChain::new(vec![name("*.txt")]);
        let (result, output) = run(&fs, &chain, &FindOptions::new());

        assert!(result.is_ok());
        assert_eq!(output, "./file1.txt\n./dir1/file2.txt\n");
    }

    #[test]
    fn test_type_filter_selects_each_kind() {
        let mut fs = MemoryFileSystem::with_root(".");
        for kind in EntryKind::ALL {
            fs = fs.entry(&format!("./{}", kind.type_code()), EntryMetadata::fixture(kind));
        }

        for kind in EntryKind::ALL {
            let chain = RequestChain::new(vec![Filter::Type(TypeFilter::from_kind(kind)).into()]);
            let (result, output) = run(&fs, &chain, &FindOptions::new());
            assert!(result.is_ok());

            let expected = if kind == EntryKind::Directory {
                // the root is a directory too
                ".\n./d\n".to_string()
            } else {
                format!("./{}\n", kind.type_code())
            };
            assert_eq!(output, expected, "-type {}", kind.type_code());
        }
    }

    #[test]
    fn test_short_circuit_stops_at_first_mismatch() {
        let fs = create_test_structure();
        let chain = RequestChain::new(vec![
            Action::Print.into(),
            name("*.md"),
            Action::Print.into(),
        ]);
        let (result, output) = run(&fs, &chain, &FindOptions::new());

        assert!(result.is_ok());
        // every entry once from the first print, notes.md twice
        assert_eq!(
            output,
            ".\n./file1.txt\n./dir1\n./dir1/file2.txt\n./dir1/empty\n./notes.md\n./notes.md\n"
        );
    }

    #[test]
    fn test_exhaustive_runs_actions_and_gates_descent() {
        let fs = create_test_structure();
        let chain = RequestChain::new(vec![name("[.d]*"), Action::Print.into()]);
        let options = FindOptions::new().with_chain_mode(ChainMode::Exhaustive);
        let (result, output) = run(&fs, &chain, &options);

        assert!(result.is_ok());
        // actions are not gated, only descent is
        assert_eq!(output, ".\n./file1.txt\n./dir1\n./dir1/file2.txt\n./dir1/empty\n./notes.md\n");

        let chain = RequestChain::new(vec![name("*.txt"), Action::Print.into()]);
        let (result, output) = run(&fs, &chain, &options);
        assert!(result.is_ok());
        // the root does not match, so nothing below it is visited
        assert_eq!(output, ".\n");
    }

    #[test]
    fn test_permission_denied_metadata_is_skipped() {
        let fs = create_test_structure().fail_metadata("./dir1", io::ErrorKind::PermissionDenied);
        let (result, output) = run(&fs, &RequestChain::default(), &FindOptions::new());

        assert!(result.is_ok());
        assert_eq!(
            output,
            ".\n./file1.txt\nstat(\"./dir1\") failed.\n./notes.md\n"
        );
    }

    #[test]
    fn test_permission_denied_opendir_is_skipped() {
        let fs = create_test_structure().fail_listing("./dir1", io::ErrorKind::PermissionDenied);
        let (result, output) = run(&fs, &RequestChain::default(), &FindOptions::new());

        assert!(result.is_ok());
        assert_eq!(
            output,
            ".\n./file1.txt\n./dir1\nopendir(./dir1) failed.\n./notes.md\n"
        );
    }

    #[test]
    fn test_permission_denied_while_listing_is_skipped() {
        let fs = create_test_structure().fail_after_listing("./dir1", io::ErrorKind::PermissionDenied);
        let (result, output) = run(&fs, &RequestChain::default(), &FindOptions::new());

        assert!(result.is_ok());
        assert_eq!(
            output,
            ".\n./file1.txt\n./dir1\n./dir1/file2.txt\n./dir1/empty\nreaddir(./dir1) failed.\n./notes.md\n"
        );
    }

    #[test]
    fn test_other_metadata_error_is_fatal() {
        let fs = create_test_structure().fail_metadata("./dir1", io::ErrorKind::Other);
        let (result, output) = run(&fs, &RequestChain::default(), &FindOptions::new());

        match result {
            Err(FindError::Metadata { path, source }) => {
                assert_eq!(path, PathBuf::from("./dir1"));
                assert_eq!(source.kind(), io::ErrorKind::Other);
            }
            other => panic!("Expected Metadata error, got {:?}", other),
        }
        // output written before the failure is kept
        assert_eq!(output, ".\n./file1.txt\n");
    }

    #[test]
    fn test_other_opendir_error_is_fatal() {
        let fs = create_test_structure().fail_listing("./dir1", io::ErrorKind::Other);
        let (result, _) = run(&fs, &RequestChain::default(), &FindOptions::new());
        assert!(matches!(result, Err(FindError::OpenDir { .. })));

        let fs = create_test_structure().fail_after_listing("./dir1", io::ErrorKind::Other);
        let (result, _) = run(&fs, &RequestChain::default(), &FindOptions::new());
        assert!(matches!(result, Err(FindError::ReadDir { .. })));
    }

    #[test]
    fn test_path_too_long_is_fatal() {
        let fs = MemoryFileSystem::with_root(".")
            .dir("./abc")
            .dir("./abc/defgh")
            .file("./abc/defgh/ijklmnop");
        // "./abc/defgh" is 11 bytes, "./abc/defgh/ijklmnop" is 20
        let options = FindOptions::new().with_max_path_length(20);
        let (result, output) = run(&fs, &RequestChain::default(), &options);

        match result {
            Err(FindError::PathTooLong(path)) => {
                assert_eq!(path, PathBuf::from("./abc/defgh/ijklmnop"))
            }
            other => panic!("Expected PathTooLong, got {:?}", other),
        }
        assert_eq!(output, ".\n./abc\n./abc/defgh\n");

        let options = FindOptions::new().with_max_path_length(21);
        let (result, _) = run(&fs, &RequestChain::default(), &options);
        assert!(result.is_ok());
    }

    #[test]
    fn test_user_filter_errors_abort() {
        let fs = create_test_structure();
        let chain = RequestChain::new(vec![Filter::User(UserFilter::new("0")).into()]);
        let (result, output) = run(&fs, &chain, &FindOptions::new());
        assert!(matches!(result, Err(FindError::InvalidUserId(_))));
        assert!(output.is_empty());

        let chain = RequestChain::new(vec![Filter::User(UserFilter::new("nobody-here")).into()]);
        let (result, _) = run(&fs, &chain, &FindOptions::new());
        assert!(matches!(result, Err(FindError::UnknownUser(_))));
    }

    #[test]
    fn test_user_filter_numeric_id() {
        let mut owned = EntryMetadata::fixture(EntryKind::File);
        owned.uid = 2000;
        let fs = create_test_structure().entry("./mine", owned);

        let chain = RequestChain::new(vec![Filter::User(UserFilter::new("2000")).into()]);
        let (result, output) = run(&fs, &chain, &FindOptions::new());
        assert!(result.is_ok());
        assert_eq!(output, "./mine\n");
    }

    #[test]
    fn test_child_path_keeps_separators() -> FindResult<()> {
        let fs = MemoryFileSystem::with_root(".");
        let identity = FixedIdentity::default();
        let chain = RequestChain::default();
        let options = FindOptions::new();
        let walker = FileWalker::new(&chain, &options, &fs, &identity, io::sink());

        assert_eq!(walker.child_path(Path::new("dir/"), OsStr::new("a"))?, PathBuf::from("dir//a"));
        assert_eq!(walker.child_path(Path::new("."), OsStr::new("b"))?, PathBuf::from("./b"));
        Ok(())
    }
}
