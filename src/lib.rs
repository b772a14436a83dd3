//! 用于查找文件和目录的库
//!
//! 本库实现了 Linux `find` 命令的一个小子集：
//! - 深度优先、先父后子的目录遍历
//! - 按所有者、名称模式和条目类型过滤
//! - 输出路径或类似 `ls -l` 的详细信息
//! - 权限不足的条目会被报告并跳过，遍历继续进行
//!
//! # 示例
//!
//! 基本用法：
//! ```no_run
//! use std::path::Path;
//! use myfind::finder::chain::{Action, RequestChain};
//! use myfind::finder::filter::{Filter, NameFilter};
//! use myfind::{Finder, FindOptions};
//!
//! // 查找当前目录下所有 Rust 源文件，并以 `-ls` 格式输出
//! let chain = RequestChain::new(vec![
//!     Filter::Name(NameFilter::new("*.rs")).into(),
//!     Action::List.into(),
//! ]);
//!
//! let finder = Finder::new(FindOptions::new());
//! finder.find(Path::new("."), &chain, std::io::stdout()).unwrap();
//! ```
//!
//! 更多用法请参考各模块文档。

pub mod cli;
pub mod errors;
pub mod finder;

// Re-export main types for convenience
pub use errors::{FindError, FindResult};
pub use finder::{Finder, FindOptions, RequestChain};
