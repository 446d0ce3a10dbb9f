use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    #[default]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 研究报告输出路径
    pub output_path: PathBuf,

    /// 模型回答使用的目标语言
    pub target_language: TargetLanguage,

    /// Coder智能体生成代码使用的编程语言
    pub code_language: String,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 论文检索配置
    pub search: SearchConfig,

    /// 研究质量指标配置
    pub metrics: MetricsConfig,

    /// 跳过代码生成
    pub skip_coding: bool,

    /// 跳过代码评审
    pub skip_review: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，用于长上下文推理，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次模型调用的超时时间（秒），由调用方施加
    pub timeout_seconds: u64,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

/// 论文检索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 合并后保留的最大论文数量
    pub max_results: usize,

    /// 主索引（arXiv）检索数量
    pub max_primary: usize,

    /// 辅助索引（Semantic Scholar）检索数量
    pub max_secondary: usize,

    /// 入库时摘要的最大字符数
    pub summary_max_chars: usize,

    /// 只保留近三年的论文
    pub recent_only: bool,

    /// 检索前是否增强查询语句
    pub enhance_query: bool,

    /// 是否启用辅助索引
    pub secondary_enabled: bool,

    /// arXiv API地址
    pub arxiv_base_url: String,

    /// Semantic Scholar API地址
    pub scholar_base_url: String,

    /// 检索请求超时时间（秒）
    pub request_timeout_seconds: u64,
}

/// 研究质量指标配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MetricsConfig {
    /// 指标日志文件路径（JSON Lines）
    pub log_path: PathBuf,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./imara.reports"),
            target_language: TargetLanguage::default(),
            code_language: String::from("Python"),
            llm: LLMConfig::default(),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
            metrics: MetricsConfig::default(),
            skip_coding: false,
            skip_review: false,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("IMARA_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("http://localhost:11434"),
            model_efficient: String::from("llama3.2:3b"),
            model_powerful: String::from("llama3.2:3b"),
            max_tokens: 4096,
            temperature: 0.7,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 300,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".imara/cache"),
            expire_hours: 24,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 7,
            max_primary: 5,
            max_secondary: 2,
            summary_max_chars: 500,
            recent_only: false,
            enhance_query: true,
            secondary_enabled: true,
            arxiv_base_url: String::from("http://export.arxiv.org/api/query"),
            scholar_base_url: String::from(
                "https://api.semanticscholar.org/graph/v1/paper/search",
            ),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("data/metrics.jsonl"),
        }
    }
}
