use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    cache::CacheManager, config::Config, llm::LanguageModel, memory::Memory,
    metrics::MetricsLog, search::PaperSearchTool,
};

#[derive(Clone)]
pub struct GeneratorContext {
    /// 语言模型，用于所有智能体的推理
    pub llm: Arc<dyn LanguageModel>,
    /// 配置
    pub config: Config,
    /// 论文检索工具
    pub search: Arc<PaperSearchTool>,
    /// 模型回答缓存
    pub cache_manager: Arc<RwLock<CacheManager>>,
    /// 智能体之间共享的工作记忆
    pub memory: Arc<RwLock<Memory>>,
    /// 研究质量指标日志
    pub metrics_log: MetricsLog,
}

impl GeneratorContext {
    /// 由语言模型与检索工具组装上下文
    pub fn new(
        config: Config,
        llm: Arc<dyn LanguageModel>,
        search: Arc<PaperSearchTool>,
    ) -> Self {
        let cache_manager = Arc::new(RwLock::new(CacheManager::new(config.cache.clone())));
        let metrics_log = MetricsLog::new(config.metrics.log_path.clone());

        Self {
            llm,
            config,
            search,
            cache_manager,
            memory: Arc::new(RwLock::new(Memory::new())),
            metrics_log,
        }
    }

    /// 调用方施加的单次模型调用超时
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.config.llm.timeout_seconds)
    }

    pub async fn store_to_memory<T>(&self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.store(scope, key, data)
    }

    pub async fn get_from_memory<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a> + Send + Sync,
    {
        let memory = self.memory.read().await;
        memory.get(scope, key)
    }

    pub async fn has_memory_data(&self, scope: &str, key: &str) -> bool {
        let memory = self.memory.read().await;
        memory.has_data(scope, key)
    }
}
