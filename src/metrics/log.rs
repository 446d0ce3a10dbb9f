//! 研究质量指标日志 - 每条记录一行的追加式JSON Lines文件

use chrono::{DateTime, Utc};
use fd_lock::RwLock;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::QualityReport;

#[derive(Debug, thiserror::Error)]
pub enum MetricsLogError {
    #[error("指标日志读写失败 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("指标记录序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 指标日志中的一条记录，写入后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub query: String,
    pub metrics: QualityReport,
    #[serde(deserialize_with = "super::deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// 追加式指标日志
///
/// 追加时持有文件排他锁，并发写入者不会互相覆盖。
#[derive(Debug, Clone)]
pub struct MetricsLog {
    path: PathBuf,
}

impl MetricsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> MetricsLogError {
        MetricsLogError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// 追加一条记录并返回写入的内容
    pub fn append(
        &self,
        query: &str,
        metrics: &QualityReport,
    ) -> Result<MetricsRecord, MetricsLogError> {
        let record = MetricsRecord {
            query: query.to_string(),
            metrics: metrics.clone(),
            timestamp: Utc::now(),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let mut lock = RwLock::new(file);
        let mut guard = lock.write().map_err(|e| self.io_error(e))?;
        guard
            .write_all(line.as_bytes())
            .map_err(|e| self.io_error(e))?;
        guard.flush().map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), query, "已追加质量指标记录");
        Ok(record)
    }

    /// 按追加顺序读取全部记录
    ///
    /// 文件不存在时返回空列表；无法解析的行或数组元素会被跳过。
    /// 兼容旧版整文件JSON数组格式，以及数组之后继续追加的JSON Lines记录。
    pub fn load(&self) -> Result<Vec<MetricsRecord>, MetricsLogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let lock = RwLock::new(file);
        let mut content = String::new();
        {
            let guard = lock.read().map_err(|e| self.io_error(e))?;
            let mut reader: &File = &guard;
            reader
                .read_to_string(&mut content)
                .map_err(|e| self.io_error(e))?;
        }

        let mut records = Vec::new();
        let mut rest = content.as_str();
        if rest.trim_start().starts_with('[') {
            let mut stream =
                serde_json::Deserializer::from_str(rest).into_iter::<Vec<serde_json::Value>>();
            match stream.next() {
                Some(Ok(entries)) => {
                    records.extend(self.parse_legacy_entries(entries));
                    rest = &rest[stream.byte_offset()..];
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        "旧版指标数组无法解析，按行读取: {}",
                        e
                    );
                }
                None => {}
            }
        }

        records.extend(self.parse_lines(rest));
        Ok(records)
    }

    fn parse_legacy_entries(&self, entries: Vec<serde_json::Value>) -> Vec<MetricsRecord> {
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        entry = index,
                        "跳过无法解析的旧版指标记录: {}",
                        e
                    );
                    None
                }
            })
            .collect()
    }

    fn parse_lines(&self, content: &str) -> Vec<MetricsRecord> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        "跳过无法解析的指标记录: {}",
                        e
                    );
                    None
                }
            })
            .collect()
    }
}
