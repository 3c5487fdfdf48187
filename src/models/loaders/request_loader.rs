use crate::models::request::{RequestFile, WorksheetRequest};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载批量生成请求
pub async fn load_requests_file(path: &Path) -> Result<Vec<WorksheetRequest>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取请求文件: {}", path.display()))?;

    let file: RequestFile = toml::from_str(&content)
        .with_context(|| format!("无法解析请求文件: {}", path.display()))?;

    if file.worksheet.is_empty() {
        tracing::warn!("请求文件 {} 中没有任何 [[worksheet]]", path.display());
    }

    Ok(file.worksheet)
}

/// 解析逗号分隔的句型编号，例如 `"2, 1"`
pub fn parse_pattern_list(value: &str) -> Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("无效的句型编号: {}", s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_pattern_list() {
        assert_eq!(parse_pattern_list("2, 1").unwrap(), vec![2, 1]);
        assert_eq!(parse_pattern_list(" 3,,4 ").unwrap(), vec![3, 4]);
        assert!(parse_pattern_list("").unwrap().is_empty());
        assert!(parse_pattern_list("1, x").is_err());
    }

    #[test]
    fn test_load_requests_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[worksheet]]
patterns = [2, 1]

[[worksheet]]
patterns = [3]
file_name = "week3.pdf"
"#
        )
        .unwrap();

        let requests = tokio_test::block_on(load_requests_file(file.path())).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].patterns, vec![2, 1]);
        assert_eq!(requests[1].file_name.as_deref(), Some("week3.pdf"));
    }
}
