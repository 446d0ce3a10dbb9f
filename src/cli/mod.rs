use crate::config::{Config, LLMProvider};
use crate::i18n::TargetLanguage;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "imara.toml";

/// IMARA - Intelligent Multi-Agent Research Assistant
#[derive(Parser, Debug)]
#[command(name = "imara")]
#[command(
    about = "Multi-agent research assistant: routes a research topic, searches academic papers, scores their quality, and compiles a report with a code skeleton and review."
)]
#[command(version)]
pub struct Args {
    /// 研究主题；省略时从标准输入读取
    #[arg(value_name = "TOPIC")]
    pub topic: Vec<String>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 跳过代码生成
    #[arg(long)]
    pub skip_coding: bool,

    /// 跳过代码评审
    #[arg(long)]
    pub skip_review: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 生成代码骨架使用的编程语言
    #[arg(long)]
    pub code_language: Option<String>,

    /// 高能效模型，优先用于常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于长上下文推理，以及作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 单次模型调用超时（秒）
    #[arg(long)]
    pub llm_timeout: Option<u64>,

    /// 合并后保留的最大论文数量
    #[arg(long)]
    pub max_results: Option<usize>,

    /// 只保留近三年的论文
    #[arg(long)]
    pub recent_only: bool,

    /// 检索前不增强查询语句
    #[arg(long)]
    pub no_enhance: bool,

    /// 不检索辅助索引（Semantic Scholar）
    #[arg(long)]
    pub no_secondary: bool,

    /// 研究质量指标日志路径
    #[arg(long)]
    pub metrics_log: Option<PathBuf>,

    /// 目标语言 (zh, en, ja, ko, de, fr, ru)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,
}

impl Args {
    /// 命令行给出的研究主题，多个参数以空格拼接
    pub fn topic(&self) -> Option<String> {
        let topic = self.topic.join(" ");
        let topic = topic.trim();
        (!topic.is_empty()).then(|| topic.to_string())
    }

    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);
                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }
        if let Some(code_language) = self.code_language {
            config.code_language = code_language;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用 {}",
                    provider_str, config.llm.provider
                ),
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            // 只指定efficient模型时，powerful模型与之相同
            if self.model_powerful.is_none() {
                config.llm.model_powerful = model_efficient.clone();
            }
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(timeout) = self.llm_timeout {
            config.llm.timeout_seconds = timeout;
        }

        // 检索配置
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }
        if self.recent_only {
            config.search.recent_only = true;
        }
        if self.no_enhance {
            config.search.enhance_query = false;
        }
        if self.no_secondary {
            config.search.secondary_enabled = false;
        }
        if let Some(metrics_log) = self.metrics_log {
            config.metrics.log_path = metrics_log;
        }

        if let Some(target_language_str) = self.target_language {
            match target_language_str.parse::<TargetLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用 {}",
                    target_language_str,
                    config.target_language.display_name()
                ),
            }
        }

        if self.no_cache {
            config.cache.enabled = false;
        }

        config.skip_coding |= self.skip_coding;
        config.skip_review |= self.skip_review;
        config.verbose |= self.verbose;

        Ok(config)
    }
}
