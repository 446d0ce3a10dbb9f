use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 单次研究运行中的工作记忆元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub data_sizes: HashMap<String, usize>,
    pub total_size: usize,
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self {
            created_at: Utc::now(),
            last_updated: Utc::now(),
            data_sizes: HashMap::new(),
            total_size: 0,
        }
    }
}

/// 按作用域划分的工作记忆，智能体之间通过它传递中间结果
#[derive(Debug, Default)]
pub struct Memory {
    data: HashMap<String, Value>,
    metadata: MemoryMetadata,
}

fn full_key(scope: &str, key: &str) -> String {
    format!("{}:{}", scope, key)
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入数据，同名键会被覆盖
    pub fn store<T>(&mut self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize,
    {
        let full_key = full_key(scope, key);
        let serialized = serde_json::to_value(data)?;
        let data_size = serialized.to_string().len();

        if let Some(old_size) = self.metadata.data_sizes.insert(full_key.clone(), data_size) {
            self.metadata.total_size -= old_size;
        }
        self.metadata.total_size += data_size;
        self.metadata.last_updated = Utc::now();

        self.data.insert(full_key, serialized);
        Ok(())
    }

    /// 读取数据，类型不匹配时返回None
    pub fn get<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a>,
    {
        self.data
            .get(&full_key(scope, key))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn has_data(&self, scope: &str, key: &str) -> bool {
        self.data.contains_key(&full_key(scope, key))
    }

    /// 作用域下的所有键，按字母序
    pub fn list_keys(&self, scope: &str) -> Vec<String> {
        let prefix = format!("{}:", scope);
        let mut keys: Vec<String> = self
            .data
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect();
        keys.sort();
        keys
    }

    /// 各作用域占用的字节数
    pub fn get_usage_stats(&self) -> HashMap<String, usize> {
        let mut stats = HashMap::new();
        for (key, size) in &self.metadata.data_sizes {
            let scope = key.split(':').next().unwrap_or("unknown").to_string();
            *stats.entry(scope).or_insert(0) += size;
        }
        stats
    }

    pub fn total_size(&self) -> usize {
        self.metadata.total_size
    }
}
