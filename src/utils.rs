use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// HTML文件扩展名
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];
/// XLIFF文件扩展名
pub const XLIFF_EXTENSION: &str = "xlf";

/// 初始化日志系统
pub fn init_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// 验证输入文件
pub fn validate_input_file(path: &Path, expected_extensions: &[&str]) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("输入文件不存在: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("输入路径不是文件: {}", path.display());
    }

    match path.extension() {
        Some(ext) if expected_extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)) => {}
        Some(ext) => warn!("⚠️  文件扩展名不是预期的类型: {}", ext.to_string_lossy()),
        None => warn!("⚠️  文件没有扩展名: {}", path.display()),
    }

    Ok(())
}

/// 验证HTML输入文件
pub fn validate_html_file(path: &Path) -> Result<()> {
    validate_input_file(path, HTML_EXTENSIONS)
}

/// 验证XLIFF输入文件
pub fn validate_xliff_file(path: &Path) -> Result<()> {
    validate_input_file(path, &[XLIFF_EXTENSION, "xliff"])
}

/// 是否为HTML文件
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| HTML_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// 递归收集目录中的HTML文件，按路径排序
pub fn collect_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("输入路径不是目录: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() && is_html_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// 生成输出文件路径
///
/// 指定了输出时直接使用，否则与输入同目录、替换扩展名：`page.html` → `page.xlf`
pub fn generate_output_path(input: &Path, output: Option<&Path>, extension: &str) -> PathBuf {
    if let Some(output_path) = output {
        return output_path.to_path_buf();
    }
    input.with_extension(extension)
}

/// 目录批量处理时的输出路径：保持相对目录结构
pub fn generate_output_path_in_dir(
    input: &Path,
    input_root: &Path,
    output_root: Option<&Path>,
    extension: &str,
) -> PathBuf {
    match output_root {
        Some(root) => {
            let relative = input.strip_prefix(input_root).unwrap_or(input);
            root.join(relative).with_extension(extension)
        }
        None => input.with_extension(extension),
    }
}

/// 文档的 `original` 名：输入文件名
pub fn original_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.html".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_generate_output_path() {
        let input = Path::new("/site/docs/page.html");
        assert_eq!(
            generate_output_path(input, None, XLIFF_EXTENSION),
            PathBuf::from("/site/docs/page.xlf")
        );
        assert_eq!(
            generate_output_path(input, Some(Path::new("out.xlf")), XLIFF_EXTENSION),
            PathBuf::from("out.xlf")
        );
        assert_eq!(
            generate_output_path_in_dir(
                input,
                Path::new("/site"),
                Some(Path::new("/out")),
                XLIFF_EXTENSION
            ),
            PathBuf::from("/out/docs/page.xlf")
        );
        assert_eq!(original_name(input), "page.html");
    }

    #[test]
    fn test_collect_html_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.html"), "<p>b</p>").unwrap();
        fs::write(dir.path().join("sub").join("a.HTM"), "<p>a</p>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = collect_html_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_html_file(f)));
        assert!(collect_html_files(&dir.path().join("b.html")).is_err());
    }

    #[test]
    fn test_validate_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        assert!(validate_html_file(&path).is_err());
        fs::write(&path, "<p>x</p>").unwrap();
        assert!(validate_html_file(&path).is_ok());
        assert!(validate_html_file(dir.path()).is_err());
    }
}
