//! 配置阶段的错误
//!
//! 这些错误会在遍历开始之前终止整个流程。单个文件的编译错误使用 `anyhow::Error`，
//! 只记录日志，不会中断遍历。

use std::path::PathBuf;

use thiserror::Error;

use crate::sdk::VULKAN_SDK_ENV;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid source directory: {0:?}")]
    InvalidSourceDirectory(PathBuf),

    #[error("invalid dest directory: --dest_directory is required")]
    MissingDestDirectory,

    #[error("could not find Vulkan SDK: {} is not set", VULKAN_SDK_ENV)]
    MissingSdk,

    #[error("could not find Vulkan SDK at {0:?}")]
    InvalidSdk(PathBuf),

    #[error("could not find shader compiler at {0:?}")]
    MissingCompiler(PathBuf),

    #[error("failed to read config file {path:?}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// 包含完整错误链的消息，例如 TOML 解析错误的行列号
    pub fn report(self) -> String {
        format!("{:#}", anyhow::Error::new(self))
    }
}
