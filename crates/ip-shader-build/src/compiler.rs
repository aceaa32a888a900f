//! 外部 shader 编译器
//!
//! 编译器以 trait 的形式注入 [`crate::ShaderBuilder`]，测试时可以替换为不调用外部进程的实现。

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, bail};

use crate::error::ConfigError;
use crate::sdk::VulkanSdk;
use crate::task::ShaderCompileTask;

/// 着色器编译器 Trait
pub trait ShaderCompiler: Send + Sync {
    /// 用于日志的名称
    fn name(&self) -> &str;

    /// 编译一个着色器，失败时返回错误
    fn compile(&self, task: &ShaderCompileTask) -> anyhow::Result<()>;

    /// 根据 cmd 执行的结果，处理输出信息
    fn process_cmd_output(&self, output: &Output) {
        if !output.stdout.is_empty() {
            log::info!("stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        if !output.stderr.is_empty() {
            log::error!("stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }
    }
}

/// GLSL 编译器
///
/// 使用 Vulkan SDK 附带的 glslangValidator 将 GLSL 编译为 SPIR-V：
/// `glslangValidator -V -o <output> <shader>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlslangValidator {
    exe_path: PathBuf,
}

impl GlslangValidator {
    pub fn new(exe_path: impl Into<PathBuf>) -> Self {
        Self {
            exe_path: exe_path.into(),
        }
    }

    /// 在 SDK 中查找 glslangValidator
    pub fn from_sdk(sdk: &VulkanSdk) -> Result<Self, ConfigError> {
        sdk.glslang_validator().map(Self::new)
    }

    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    /// 构造编译命令，参数直接传递给进程，不经过 shell
    pub fn command(&self, task: &ShaderCompileTask) -> Command {
        let mut cmd = Command::new(&self.exe_path);
        cmd.arg("-V") // 输出 Vulkan 语义的 SPIR-V
            .arg("-o")
            .arg(&task.output_path)
            .arg(&task.shader_path);
        cmd
    }
}

impl ShaderCompiler for GlslangValidator {
    fn name(&self) -> &str {
        "glslangValidator"
    }

    fn compile(&self, task: &ShaderCompileTask) -> anyhow::Result<()> {
        let output = self
            .command(task)
            .output()
            .with_context(|| format!("failed to execute {:?}", self.exe_path))?;

        self.process_cmd_output(&output);

        if !output.status.success() {
            bail!("{} failed on {:?}: {}", self.name(), task.shader_path, output.status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn sample_task() -> ShaderCompileTask {
        ShaderCompileTask {
            shader_path: PathBuf::from("shaders/my shader.vert"),
            output_path: PathBuf::from("out dir/my shader_vert.spv"),
        }
    }

    #[test]
    fn test_command_line() {
        let compiler = GlslangValidator::new("/sdk/bin/glslangValidator");
        let cmd = compiler.command(&sample_task());

        assert_eq!(cmd.get_program(), OsStr::new("/sdk/bin/glslangValidator"));
        let args: Vec<&OsStr> = cmd.get_args().collect();
        // 含空格的路径作为单个参数传递，不需要引号
        assert_eq!(
            args,
            [
                OsStr::new("-V"),
                OsStr::new("-o"),
                OsStr::new("out dir/my shader_vert.spv"),
                OsStr::new("shaders/my shader.vert"),
            ]
        );
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = GlslangValidator::new(dir.path().join("missing-glslangValidator"));

        let err = compiler.compile(&sample_task()).unwrap_err();
        assert!(err.to_string().contains("failed to execute"));
    }

    #[test]
    fn test_from_sdk_requires_compiler() {
        let dir = tempfile::tempdir().unwrap();
        let sdk = VulkanSdk::new(dir.path()).unwrap();
        assert!(matches!(GlslangValidator::from_sdk(&sdk), Err(ConfigError::MissingCompiler(_))));
    }
}
