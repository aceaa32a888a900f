//! 增量编译
//!
//! 遍历源码目录，对每个过期的文件调用编译器。单个文件失败只记录错误，不会中断遍历。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use crate::compiler::ShaderCompiler;
use crate::task::ShaderCompileTask;

/// 单个文件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildOutcome {
    Compiled,
    UpToDate,
}

/// 一次构建的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// 调用编译器并成功的文件数
    pub compiled: usize,
    /// 输出已经是最新、被跳过的文件数
    pub skipped: usize,
    /// 处理失败的源文件
    pub failed: Vec<PathBuf>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 在构建之前准备输出目录
///
/// `clean` 为 true 时先删除整个输出目录；目录不存在时递归创建。
pub fn prepare_dest_dir(dest_dir: &Path, clean: bool) -> anyhow::Result<()> {
    if clean && dest_dir.exists() {
        log::info!("Cleaning destination directory {}...", dest_dir.display());
        std::fs::remove_dir_all(dest_dir).with_context(|| format!("failed to remove {dest_dir:?}"))?;
    }

    if !dest_dir.exists() {
        log::info!("Destination directory {} does not exist, creating...", dest_dir.display());
        std::fs::create_dir_all(dest_dir).with_context(|| format!("failed to create {dest_dir:?}"))?;
    }

    Ok(())
}

pub struct ShaderBuilder<'a> {
    source_dir: PathBuf,
    dest_dir: PathBuf,
    compiler: &'a dyn ShaderCompiler,
}

impl<'a> ShaderBuilder<'a> {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>, compiler: &'a dyn ShaderCompiler) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            compiler,
        }
    }

    /// 遍历源码目录，编译所有过期的文件
    ///
    /// 每个文件只访问一次，按文件名排序，保证多次运行的顺序一致。
    pub fn build(&self) -> BuildReport {
        let mut report = BuildReport::default();
        // 输出路径 -> 第一个占用它的源文件
        let mut claimed_outputs = HashMap::new();

        // 输出目录位于源码目录内时，不能把编译产物当作源文件
        let walker = walkdir::WalkDir::new(&self.source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.file_type().is_dir() && self.is_dest_dir(entry.path())));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::error!("Failed to walk {}: {err}", self.source_dir.display());
                    report.failed.push(err.path().unwrap_or(self.source_dir.as_path()).to_path_buf());
                    continue;
                }
            };
            // 与 Path::is_file 一致：跟随指向文件的符号链接
            if !entry.path().is_file() {
                continue;
            }

            match self.build_one(entry.path(), &mut claimed_outputs) {
                Ok(BuildOutcome::Compiled) => report.compiled += 1,
                Ok(BuildOutcome::UpToDate) => report.skipped += 1,
                Err(err) => {
                    log::error!("Error: {err:#}");
                    report.failed.push(entry.into_path());
                }
            }
        }

        report
    }

    /// `dir` 是否就是输出目录，比较规范化之后的路径，使 `out`、`./out` 与绝对路径一致
    ///
    /// 输出目录可能在遍历过程中才被创建，因此每次都重新规范化。
    fn is_dest_dir(&self, dir: &Path) -> bool {
        match (std::fs::canonicalize(dir), std::fs::canonicalize(&self.dest_dir)) {
            (Ok(dir), Ok(dest_dir)) => dir == dest_dir,
            _ => false,
        }
    }

    fn build_one(
        &self,
        shader_path: &Path,
        claimed_outputs: &mut HashMap<PathBuf, PathBuf>,
    ) -> anyhow::Result<BuildOutcome> {
        let task = ShaderCompileTask::new(&self.source_dir, &self.dest_dir, shader_path)?;

        if let Some(previous) = claimed_outputs.get(&task.output_path) {
            bail!(
                "{} and {} both compile to {}, skipping the latter",
                previous.display(),
                shader_path.display(),
                task.output_path.display()
            );
        }
        claimed_outputs.insert(task.output_path.clone(), task.shader_path.clone());

        if !task.is_stale()? {
            log::debug!("Up to date: {}", task.output_path.display());
            return Ok(BuildOutcome::UpToDate);
        }

        log::info!("Compiling {} into {}...", task.shader_path.display(), task.output_path.display());

        // 确保输出目录存在
        if let Some(parent) = task.output_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("failed to create {parent:?}"))?;
        }

        self.compiler.compile(&task)?;
        Ok(BuildOutcome::Compiled)
    }
}
