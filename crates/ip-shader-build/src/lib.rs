//! Shader 增量编译
//!
//! 递归遍历 shader 源码目录，将每个比输出文件更新的源文件交给外部编译器
//! （Vulkan SDK 中的 glslangValidator）编译为 SPIR-V，输出目录的结构与源码目录一致。
//!
//! 输出文件名规则：`{文件名主干}_{扩展名}.spv`，例如 `tri.vert` -> `tri_vert.spv`。

pub mod builder;
pub mod compiler;
pub mod config;
pub mod error;
pub mod sdk;
pub mod task;

pub use builder::{BuildReport, ShaderBuilder, prepare_dest_dir};
pub use compiler::{GlslangValidator, ShaderCompiler};
pub use config::{BuildConfig, ShaderBuildArgs};
pub use error::ConfigError;
pub use sdk::VulkanSdk;
pub use task::ShaderCompileTask;
