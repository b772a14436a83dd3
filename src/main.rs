use std::io::{self, BufWriter};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use myfind::cli::Cli;
use myfind::finder::{FindOptions, Finder};

fn main() -> Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 初始化日志，RUST_LOG 优先
    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let options = FindOptions::from_cli(&cli);
    debug!("查找选项: {:?}", options);

    // 构建请求链，参数错误时不进行任何遍历
    let (root, chain) = cli
        .build_request(options.max_path_length)
        .map_err(|err| {
            if err.is_argument_error() {
                anyhow::Error::new(err).context("invalid expression, see --help")
            } else {
                anyhow::Error::new(err)
            }
        })?;

    info!("开始运行 myfind");
    let start_time = Instant::now();

    // 结果和权限提示都写到标准输出
    let out = BufWriter::new(io::stdout().lock());
    Finder::new(options)
        .find(&root, &chain, out)
        .with_context(|| format!("search in {} aborted", root.display()))?;

    let elapsed = start_time.elapsed();
    info!("搜索完成，耗时 {:.2?}", elapsed);

    Ok(())
}
