use serde::{Deserialize, Serialize};

/// 目标语言类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum TargetLanguage {
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "en")]
    #[default]
    English,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ru")]
    Russian,
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Chinese => write!(f, "zh"),
            TargetLanguage::English => write!(f, "en"),
            TargetLanguage::Japanese => write!(f, "ja"),
            TargetLanguage::Korean => write!(f, "ko"),
            TargetLanguage::German => write!(f, "de"),
            TargetLanguage::French => write!(f, "fr"),
            TargetLanguage::Russian => write!(f, "ru"),
        }
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" | "chinese" | "中文" => Ok(TargetLanguage::Chinese),
            "en" | "english" | "英文" => Ok(TargetLanguage::English),
            "ja" | "japanese" | "日本語" | "日文" => Ok(TargetLanguage::Japanese),
            "ko" | "korean" | "한국어" | "韩文" => Ok(TargetLanguage::Korean),
            "de" | "german" | "deutsch" | "德文" => Ok(TargetLanguage::German),
            "fr" | "french" | "français" | "法文" => Ok(TargetLanguage::French),
            "ru" | "russian" | "русский" | "俄文" => Ok(TargetLanguage::Russian),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl TargetLanguage {
    /// 获取语言的描述性名称
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "中文",
            TargetLanguage::English => "English",
            TargetLanguage::Japanese => "日本語",
            TargetLanguage::Korean => "한국어",
            TargetLanguage::German => "Deutsch",
            TargetLanguage::French => "Français",
            TargetLanguage::Russian => "Русский",
        }
    }

    /// 获取追加到系统提示词末尾的语言指令
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            TargetLanguage::Chinese => "请使用中文回答，确保表达准确、专业、易于理解。",
            TargetLanguage::English => {
                "Please answer in English, using accurate, professional, and easy-to-understand language."
            }
            TargetLanguage::Japanese => {
                "日本語で回答してください。正確で専門的で理解しやすい表現を心がけてください。"
            }
            TargetLanguage::Korean => {
                "한국어로 답변해 주세요. 정확하고 전문적이며 이해하기 쉬운 표현을 사용해 주세요."
            }
            TargetLanguage::German => {
                "Bitte antworten Sie auf Deutsch, präzise, professionell und leicht verständlich."
            }
            TargetLanguage::French => {
                "Veuillez répondre en français, de manière précise, professionnelle et facile à comprendre."
            }
            TargetLanguage::Russian => {
                "Пожалуйста, отвечайте на русском языке точно, профессионально и понятно."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TargetLanguage;

    #[test]
    fn test_target_language_parse() {
        assert_eq!("zh".parse::<TargetLanguage>().unwrap(), TargetLanguage::Chinese);
        assert_eq!("English".parse::<TargetLanguage>().unwrap(), TargetLanguage::English);
        assert_eq!("日本語".parse::<TargetLanguage>().unwrap(), TargetLanguage::Japanese);
        assert!("klingon".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_target_language_default_is_english() {
        let language = TargetLanguage::default();
        assert_eq!(language.to_string(), "en");
        assert_eq!(language.display_name(), "English");
        assert!(language.prompt_instruction().contains("English"));
    }
}
