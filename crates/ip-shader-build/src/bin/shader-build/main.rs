//! Shader 编译工具
//!
//! 将源码目录下的所有 shader 编译为 SPIR-V，输出到目标目录，只重新编译比输出更新的文件。
//!
//! ```text
//! shader-build [--clean] [--source_directory DIR] --dest_directory DIR [--config FILE]
//! ```

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use ip_crate_tools::init_log::init_log;
use ip_shader_build::{BuildConfig, ShaderBuildArgs, ShaderBuilder};

fn main() -> ExitCode {
    init_log();

    let args = ShaderBuildArgs::parse();

    let config = match BuildConfig::resolve(args) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error: {}", err.report());
            if let Err(err) = ShaderBuildArgs::command().print_help() {
                log::error!("failed to print help: {err}");
            }
            return ExitCode::FAILURE;
        }
    };

    let compiler = match config.compiler(|key| std::env::var_os(key)) {
        Ok(compiler) => compiler,
        Err(err) => {
            log::error!("Error: {}", err.report());
            return ExitCode::FAILURE;
        }
    };

    log::info!("Shader source path: {:?}", config.source_dir);
    log::info!("Shader output path: {:?}", config.dest_dir);
    log::info!("Shader compiler: {:?}", compiler.exe_path());
    log::info!("Compiling shaders...");

    if let Err(err) = ip_shader_build::prepare_dest_dir(&config.dest_dir, config.clean) {
        log::error!("Error: {err:#}");
        return ExitCode::FAILURE;
    }

    let report = ShaderBuilder::new(&config.source_dir, &config.dest_dir, &compiler).build();

    log::info!(
        "{} compiled, {} up to date, {} failed",
        report.compiled,
        report.skipped,
        report.failed.len()
    );
    for path in &report.failed {
        log::warn!("failed: {}", path.display());
    }
    log::info!("Finished");

    // 与单个文件的编译失败无关，只要遍历完成就返回 0
    ExitCode::SUCCESS
}
