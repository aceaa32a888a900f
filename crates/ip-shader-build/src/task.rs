//! 单个 shader 的编译任务：输出路径的推导，以及是否需要重新编译

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;

/// 编译产物的扩展名
pub const SPIRV_EXTENSION: &str = "spv";

/// 一个具体的编译任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderCompileTask {
    pub shader_path: PathBuf,
    pub output_path: PathBuf,
}

impl ShaderCompileTask {
    /// 根据源文件路径构造编译任务
    ///
    /// 输出路径为 `dest_root/<相对目录>/{stem}_{ext}.spv`，其中相对目录是 `shader_path`
    /// 所在目录相对 `source_root` 的路径。
    ///
    /// # Errors
    /// `shader_path` 不在 `source_root` 下，或者文件名不是合法的 UTF-8
    pub fn new(source_root: &Path, dest_root: &Path, shader_path: &Path) -> anyhow::Result<Self> {
        let shader_dir = shader_path.parent().unwrap_or(Path::new(""));
        let relative_dir = shader_dir
            .strip_prefix(source_root)
            .with_context(|| format!("{shader_path:?} is not under {source_root:?}"))?;

        let file_name = shader_path
            .file_name()
            .with_context(|| format!("{shader_path:?} has no file name"))?
            .to_str()
            .with_context(|| format!("file name of {shader_path:?} is not valid UTF-8"))?;

        let output_path = dest_root.join(relative_dir).join(dest_file_name(file_name));

        Ok(Self {
            shader_path: shader_path.to_path_buf(),
            output_path,
        })
    }

    /// 源文件的修改时间不早于输出文件时需要重新编译，输出文件不存在时总是需要
    pub fn is_stale(&self) -> anyhow::Result<bool> {
        let source_time = modified_time(&self.shader_path)?
            .with_context(|| format!("shader source {:?} is not a file", self.shader_path))?;
        let output_time = modified_time(&self.output_path)?;

        Ok(needs_rebuild(source_time, output_time))
    }
}

/// 读取文件的修改时间，路径不是文件时返回 `None`
pub fn modified_time(path: &Path) -> anyhow::Result<Option<SystemTime>> {
    if !path.is_file() {
        return Ok(None);
    }
    let time = std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("failed to read modification time of {path:?}"))?;
    Ok(Some(time))
}

/// 缺失的输出文件视为最早的时间，因此总是需要编译；时间相同时也需要编译
pub fn needs_rebuild(source_time: SystemTime, output_time: Option<SystemTime>) -> bool {
    output_time.is_none_or(|output_time| source_time >= output_time)
}

/// 根据源文件名生成输出文件名：`{stem}_{ext}.spv`
///
/// ```
/// use ip_shader_build::task::dest_file_name;
///
/// assert_eq!(dest_file_name("tri.vert"), "tri_vert.spv");
/// assert_eq!(dest_file_name("shader.frag.glsl"), "shader.frag_glsl.spv");
/// ```
pub fn dest_file_name(file_name: &str) -> String {
    let (stem, extension) = split_file_name(file_name);
    format!("{stem}_{}.{SPIRV_EXTENSION}", naming_extension(extension))
}

/// 将文件名拆分为 `(stem, extension)`，`extension` 带有前导的 `.`
///
/// 只有最后一个 `.` 之后的部分是扩展名；开头的 `.` 属于 stem（例如 `.hidden` 没有扩展名）。
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(index) => file_name.split_at(leading_dots + index),
        None => (file_name, ""),
    }
}

/// 用于输出文件名的扩展名：去掉扩展名中第一个 `.` 及其之前的内容
pub fn naming_extension(extension: &str) -> &str {
    match extension.find('.') {
        Some(index) => &extension[index + 1..],
        None => extension,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("tri.vert"), ("tri", ".vert"));
        assert_eq!(split_file_name("shader.frag.glsl"), ("shader.frag", ".glsl"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".hidden"), (".hidden", ""));
        assert_eq!(split_file_name("..hidden.vert"), ("..hidden", ".vert"));
        assert_eq!(split_file_name("trailing."), ("trailing", "."));
        assert_eq!(split_file_name("..."), ("...", ""));
    }

    #[test]
    fn test_naming_extension() {
        assert_eq!(naming_extension(".vert"), "vert");
        assert_eq!(naming_extension("."), "");
        assert_eq!(naming_extension(""), "");
        assert_eq!(naming_extension("vert"), "vert");
        assert_eq!(naming_extension("a.b"), "b");
    }

    #[test]
    fn test_dest_file_name() {
        assert_eq!(dest_file_name("tri.vert"), "tri_vert.spv");
        assert_eq!(dest_file_name("basic.frag"), "basic_frag.spv");
        // 多个 `.` 时只有最后一段是扩展名
        assert_eq!(dest_file_name("shader.frag.glsl"), "shader.frag_glsl.spv");
        assert_eq!(dest_file_name("a.b.c.comp"), "a.b.c_comp.spv");
        assert_eq!(dest_file_name("README"), "README_.spv");
        assert_eq!(dest_file_name(".hidden"), ".hidden_.spv");
        assert_eq!(dest_file_name("trailing."), "trailing_.spv");
    }

    #[test]
    fn test_task_mirrors_relative_directory() {
        let task = ShaderCompileTask::new(
            Path::new("shaders"),
            Path::new("out"),
            Path::new("shaders/post/blur.comp"),
        )
        .unwrap();

        assert_eq!(task.shader_path, Path::new("shaders/post/blur.comp"));
        assert_eq!(task.output_path, Path::new("out").join("post").join("blur_comp.spv"));
    }

    #[test]
    fn test_task_at_source_root() {
        let task =
            ShaderCompileTask::new(Path::new("shaders"), Path::new("out"), Path::new("shaders/basic.vert")).unwrap();
        assert_eq!(task.output_path, Path::new("out").join("basic_vert.spv"));
    }

    #[test]
    fn test_task_outside_source_root() {
        let result = ShaderCompileTask::new(Path::new("shaders"), Path::new("out"), Path::new("other/basic.vert"));
        assert!(result.is_err());
    }

    #[test]
    fn test_needs_rebuild() {
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let t2 = t1 + Duration::from_secs(1);

        assert!(needs_rebuild(t1, None));
        assert!(needs_rebuild(SystemTime::UNIX_EPOCH, None));
        assert!(needs_rebuild(t2, Some(t1)));
        // 时间相同也视为过期
        assert!(needs_rebuild(t1, Some(t1)));
        assert!(!needs_rebuild(t1, Some(t2)));
    }

    #[test]
    fn test_is_stale_reads_file_times() {
        let dir = tempfile::tempdir().unwrap();
        let source_root = dir.path().join("src");
        let dest_root = dir.path().join("out");
        std::fs::create_dir_all(&source_root).unwrap();
        std::fs::create_dir_all(&dest_root).unwrap();

        let shader_path = source_root.join("basic.vert");
        std::fs::write(&shader_path, "void main() {}").unwrap();
        let task = ShaderCompileTask::new(&source_root, &dest_root, &shader_path).unwrap();

        // 输出不存在
        assert!(task.is_stale().unwrap());

        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let t2 = t1 + Duration::from_secs(60);
        std::fs::write(&task.output_path, b"spv").unwrap();
        set_modified(&shader_path, t1);
        set_modified(&task.output_path, t2);
        assert!(!task.is_stale().unwrap());

        set_modified(&task.output_path, t1);
        assert!(task.is_stale().unwrap());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let task = ShaderCompileTask {
            shader_path: PathBuf::from("does/not/exist.vert"),
            output_path: PathBuf::from("out/exist_vert.spv"),
        };
        assert!(task.is_stale().is_err());
    }

    fn set_modified(path: &Path, time: SystemTime) {
        std::fs::File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
    }
}
