/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 句型数据库文件（TOML / JSON 导出的工作簿）
    pub database_path: String,
    /// PDF 输出目录
    pub output_folder: String,
    /// 嵌入字体（韩文需要）
    pub font_path: String,
    /// 生成请求文件，优先于 `patterns`
    pub requests_file: Option<String>,
    /// 单次请求的句型列表，例如 "2,1"
    pub patterns: Option<String>,
    /// 同时生成的工作表数量
    pub max_concurrent_worksheets: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "database.xlsx".to_string(),
            output_folder: "outputs".to_string(),
            font_path: "fonts/NanumGothic.ttf".to_string(),
            requests_file: None,
            patterns: None,
            max_concurrent_worksheets: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or(default.database_path),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            font_path: std::env::var("FONT_PATH").unwrap_or(default.font_path),
            requests_file: non_empty_var("REQUESTS_FILE").or(default.requests_file),
            patterns: non_empty_var("PATTERNS").or(default.patterns),
            max_concurrent_worksheets: std::env::var("MAX_CONCURRENT_WORKSHEETS").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(default.max_concurrent_worksheets),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database_path, "database.xlsx");
        assert_eq!(config.max_concurrent_worksheets, 4);
        assert!(config.requests_file.is_none());
        assert!(!config.verbose_logging);
    }
}
