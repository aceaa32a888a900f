//! 命令行参数与配置文件
//!
//! 优先级：命令行 > 配置文件 > 默认值。

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::compiler::GlslangValidator;
use crate::error::ConfigError;
use crate::sdk::VulkanSdk;

/// 默认的源码目录：当前目录
pub const DEFAULT_SOURCE_DIRECTORY: &str = ".";

#[derive(Parser, Debug, Default, Clone)]
#[command(name = "shader-build")]
#[command(about = "Compile shaders into SPIR-V, skipping sources whose output is up to date")]
pub struct ShaderBuildArgs {
    /// Delete the destination directory before building
    #[arg(long)]
    pub clean: bool,

    /// Root of the shader sources [default: .]
    #[arg(long = "source_directory")]
    pub source_directory: Option<PathBuf>,

    /// Root of the compiled output tree
    #[arg(long = "dest_directory")]
    pub dest_directory: Option<PathBuf>,

    /// TOML file providing defaults for the options above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// TOML 配置文件
///
/// ```toml
/// source_directory = "shaders"
/// dest_directory = "build/shaders"
/// clean = false
/// vulkan_sdk = "C:/VulkanSDK/1.3.290.0"
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaderBuildConfigFile {
    pub source_directory: Option<PathBuf>,
    pub dest_directory: Option<PathBuf>,
    #[serde(default)]
    pub clean: bool,
    /// 覆盖 `VULKAN_SDK` 环境变量
    pub vulkan_sdk: Option<PathBuf>,
}

impl ShaderBuildConfigFile {
    /// 从 TOML 文件加载配置，相对路径以配置文件所在目录为基准
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path.parent().unwrap_or(Path::new(""));
        Ok(config.relative_to(base_dir))
    }

    fn relative_to(self, base_dir: &Path) -> Self {
        let resolve = |path: Option<PathBuf>| path.map(|path| base_dir.join(path));
        Self {
            source_directory: resolve(self.source_directory),
            dest_directory: resolve(self.dest_directory),
            clean: self.clean,
            vulkan_sdk: resolve(self.vulkan_sdk),
        }
    }
}

/// 校验之后的构建配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub clean: bool,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// 来自配置文件的 SDK 路径；为 `None` 时使用环境变量
    pub vulkan_sdk: Option<PathBuf>,
}

impl BuildConfig {
    /// 读取 `--config` 指定的文件（如果有），与命令行参数合并并校验
    pub fn resolve(args: ShaderBuildArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => ShaderBuildConfigFile::from_file(path)?,
            None => ShaderBuildConfigFile::default(),
        };
        Self::merge(args, file)
    }

    /// 合并命令行与配置文件
    ///
    /// # Errors
    /// - 源码目录不存在或者不是目录
    /// - 没有指定输出目录
    pub fn merge(args: ShaderBuildArgs, file: ShaderBuildConfigFile) -> Result<Self, ConfigError> {
        let source_dir = args
            .source_directory
            .or(file.source_directory)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIRECTORY));
        if !source_dir.is_dir() {
            return Err(ConfigError::InvalidSourceDirectory(source_dir));
        }

        let dest_dir = args
            .dest_directory
            .or(file.dest_directory)
            .ok_or(ConfigError::MissingDestDirectory)?;

        Ok(Self {
            clean: args.clean || file.clean,
            source_dir,
            dest_dir,
            vulkan_sdk: file.vulkan_sdk,
        })
    }

    /// 配置文件中的 `vulkan_sdk` 优先，否则通过 `lookup` 查询 `VULKAN_SDK`
    pub fn vulkan_sdk(&self, lookup: impl FnOnce(&str) -> Option<OsString>) -> Result<VulkanSdk, ConfigError> {
        match &self.vulkan_sdk {
            Some(root) => VulkanSdk::new(root),
            None => VulkanSdk::from_lookup(lookup),
        }
    }

    /// 在 SDK 中查找编译器
    pub fn compiler(&self, lookup: impl FnOnce(&str) -> Option<OsString>) -> Result<GlslangValidator, ConfigError> {
        GlslangValidator::from_sdk(&self.vulkan_sdk(lookup)?)
    }
}
