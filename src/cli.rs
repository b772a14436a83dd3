//! find 工具的命令行接口
//!
//! 本模块提供了 find 工具的命令行接口，
//! 包括参数解析以及把查找表达式转换为请求链。

use std::path::PathBuf;

use clap::Parser;

use crate::errors::{FindError, FindResult};
use crate::finder::chain::{Action, Request, RequestChain};
use crate::finder::filter::{Filter, NameFilter, TypeFilter, UserFilter};

/// Linux find 命令的简化 Rust 实现
///
/// EXPRESSION 由可选的起始路径（必须在最前面）以及以下各项组成：
/// -user NAME|UID, -name PATTERN, -type [bcdpfls], -print, -ls
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 启用调试日志
    #[arg(long)]
    pub debug: bool,

    /// 对每个条目执行表达式中的所有项，只进入满足全部条件的目录
    #[arg(long)]
    pub eager_actions: bool,

    /// 以 UTC 显示 -ls 的修改时间
    #[arg(long)]
    pub utc: bool,

    /// 起始路径（默认：当前目录）和查找表达式
    #[arg(
        value_name = "EXPRESSION",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub expression: Vec<String>,
}

impl Cli {
    /// 解析查找表达式，得到起始路径和请求链
    pub fn build_request(&self, max_path_length: usize) -> FindResult<(PathBuf, RequestChain)> {
        parse_expression(&self.expression, max_path_length)
    }
}

/// 把 find 风格的参数列表转换为起始路径和请求链
///
/// 路径只能作为第一个参数出现；没有显式动作时请求链末尾会追加 `-print`。
pub fn parse_expression(args: &[String], max_path_length: usize) -> FindResult<(PathBuf, RequestChain)> {
    let mut root = PathBuf::from(".");
    let mut requests = Vec::new();
    let mut args = args.iter().enumerate();

    while let Some((index, arg)) = args.next() {
        if !arg.starts_with('-') {
            if index != 0 {
                return Err(FindError::UnexpectedArgument(arg.clone()));
            }
            if arg.len() >= max_path_length {
                return Err(FindError::RootPathTooLong(PathBuf::from(arg)));
            }
            root = PathBuf::from(arg);
            continue;
        }

        let request: Request = match arg.as_str() {
            "-user" => Filter::User(UserFilter::new(value_for(arg, &mut args)?)).into(),
            "-name" => Filter::Name(NameFilter::new(value_for(arg, &mut args)?)).into(),
            "-type" => Filter::Type(TypeFilter::new(value_for(arg, &mut args)?)?).into(),
            "-print" => Action::Print.into(),
            "-ls" => Action::List.into(),
            _ => return Err(FindError::UnknownOption(arg.clone())),
        };
        requests.push(request);
    }

    Ok((root, RequestChain::new(requests)))
}

/// 取出选项后面的参数值
fn value_for<'a>(
    option: &str,
    args: &mut impl Iterator<Item = (usize, &'a String)>,
) -> FindResult<&'a str> {
    args.next()
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| FindError::MissingValue(option.to_string()))
}
