//! Vulkan SDK 路径
//!
//! SDK 根目录由调用方注入（通常来自环境变量），编译器路径相对 SDK 根目录固定。

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 提供 SDK 根目录的环境变量
pub const VULKAN_SDK_ENV: &str = "VULKAN_SDK";

/// glslangValidator 相对 SDK 根目录的路径
#[cfg(windows)]
const GLSLANG_VALIDATOR_RELATIVE_PATH: [&str; 2] = ["Bin", "glslangValidator.exe"];
#[cfg(not(windows))]
const GLSLANG_VALIDATOR_RELATIVE_PATH: [&str; 2] = ["bin", "glslangValidator"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulkanSdk {
    root: PathBuf,
}

impl VulkanSdk {
    /// 使用给定的 SDK 根目录，目录必须存在
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        if !root.exists() {
            return Err(ConfigError::InvalidSdk(root));
        }
        Ok(Self { root })
    }

    /// 从进程环境变量 `VULKAN_SDK` 中读取
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// 通过 `lookup` 查询 `VULKAN_SDK`，测试时可以替换环境
    pub fn from_lookup(lookup: impl FnOnce(&str) -> Option<OsString>) -> Result<Self, ConfigError> {
        match lookup(VULKAN_SDK_ENV) {
            Some(root) if !root.is_empty() => Self::new(root),
            _ => Err(ConfigError::MissingSdk),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// glslangValidator 的路径，不检查文件是否存在
    pub fn glslang_validator_path(&self) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(GLSLANG_VALIDATOR_RELATIVE_PATH);
        path
    }

    /// glslangValidator 的路径，文件不存在时返回错误
    pub fn glslang_validator(&self) -> Result<PathBuf, ConfigError> {
        let path = self.glslang_validator_path();
        if !path.is_file() {
            return Err(ConfigError::MissingCompiler(path));
        }
        Ok(path)
    }
}
