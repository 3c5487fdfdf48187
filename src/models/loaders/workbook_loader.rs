use crate::models::raw::{RawCell, RawTable, RawWorkbook};
use anyhow::{Context, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;
use tokio::fs;

/// 数据库文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkbookFormat {
    Toml,
    Json,
    Xlsx,
}

impl WorkbookFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Some(WorkbookFormat::Toml),
            Some("json") => Some(WorkbookFormat::Json),
            Some("xlsx") => Some(WorkbookFormat::Xlsx),
            _ => None,
        }
    }
}

/// 解析表格导出内容
fn parse_with_format(content: &[u8], format: WorkbookFormat) -> Result<RawWorkbook> {
    let workbook: RawWorkbook = match format {
        WorkbookFormat::Toml => {
            let text = std::str::from_utf8(content).context("TOML表格数据不是UTF-8文本")?;
            toml::from_str(text).context("无法解析TOML表格数据")?
        }
        WorkbookFormat::Json => serde_json::from_slice(content).context("无法解析JSON表格数据")?,
        WorkbookFormat::Xlsx => parse_xlsx(content)?,
    };
    Ok(workbook)
}

/// 读取 Excel 工作簿
///
/// 每个工作表第一行作为表头，其余行原样转换为 `RawCell`
pub fn parse_xlsx(bytes: &[u8]) -> Result<RawWorkbook> {
    let mut excel: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).context("无法打开Excel工作簿")?;

    let mut tables = Vec::new();
    for name in excel.sheet_names() {
        let range = excel
            .worksheet_range(&name)
            .with_context(|| format!("无法读取工作表: {}", name))?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|row| row.iter().map(|c| xlsx_cell(c).as_text()).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<RawCell>> = rows.map(|row| row.iter().map(xlsx_cell).collect()).collect();

        tables.push(RawTable {
            name,
            headers,
            rows,
        });
    }

    Ok(RawWorkbook { tables })
}

fn xlsx_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Bool(v) => RawCell::Bool(*v),
        Data::Int(v) => RawCell::Int(*v),
        Data::Float(v) => RawCell::Float(*v),
        Data::String(s) => RawCell::Text(s.clone()),
        other => RawCell::Text(other.to_string()),
    }
}

/// 解析表格导出内容，`format_hint` 为 "toml" 或 "json"
pub fn parse_workbook(content: &str, format_hint: &str) -> Result<RawWorkbook> {
    let format = match format_hint.to_ascii_lowercase().as_str() {
        "toml" => WorkbookFormat::Toml,
        "json" => WorkbookFormat::Json,
        other => anyhow::bail!("不支持的表格格式: {}", other),
    };
    parse_with_format(content.as_bytes(), format)
}

/// 从文件加载上传的表格数据（xlsx，或 TOML / JSON 导出）
pub async fn load_workbook_file(path: &Path) -> Result<RawWorkbook> {
    let format = WorkbookFormat::from_path(path)
        .with_context(|| format!("无法识别的数据库文件类型: {}", path.display()))?;

    let content = fs::read(path)
        .await
        .with_context(|| format!("无法读取数据库文件: {}", path.display()))?;

    let workbook = parse_with_format(&content, format)
        .with_context(|| format!("无法解析数据库文件: {}", path.display()))?;

    tracing::info!(
        "成功加载数据库文件 {}，共 {} 张工作表",
        path.file_name().unwrap_or_default().to_string_lossy(),
        workbook.tables.len()
    );

    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_toml_workbook() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[tables]]
name = "Pattern Overview"
headers = ["Pattern Number", "Pattern Name", "Total Items"]
rows = [[1, "I like ...", 20]]
"#
        )
        .unwrap();

        let workbook = load_workbook_file(file.path()).await.unwrap();
        assert_eq!(workbook.tables.len(), 1);
        assert!(workbook.table("Pattern Overview").is_some());
    }

    #[tokio::test]
    async fn test_reject_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let err = load_workbook_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("无法识别的数据库文件类型"));
    }

    #[tokio::test]
    async fn test_load_xlsx_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/database.xlsx");
        let workbook = load_workbook_file(&path).await.unwrap();

        let overview = workbook.table("Pattern Overview").unwrap();
        assert_eq!(
            overview.headers,
            vec!["Pattern Number", "Pattern Name", "Total Items", "Unit"]
        );
        assert_eq!(overview.rows.len(), 2);
        assert_eq!(overview.rows[0][0].as_int(), Some(1));
        assert_eq!(overview.rows[0][1], RawCell::from("Be verbs"));

        let details = workbook.table("Pattern Details").unwrap();
        assert_eq!(details.headers.len(), 7);
        assert_eq!(details.rows.len(), 40);
    }

    #[test]
    fn test_broken_xlsx_is_error() {
        let err = parse_xlsx(b"not a zip").unwrap_err();
        assert!(err.to_string().contains("无法打开Excel工作簿"));
    }

    #[test]
    fn test_parse_workbook_json() {
        let workbook = parse_workbook(r#"{"tables": []}"#, "JSON").unwrap();
        assert!(workbook.tables.is_empty());
        assert!(parse_workbook("", "csv").is_err());
    }
}
