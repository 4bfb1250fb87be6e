//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 音色性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    /// 解析后端返回的性别字段（"Male" / "Female" / 其它）
    pub fn from_backend(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unspecified => "unspecified",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 区域设置，如 "zh-CN"、"en-US"
///
/// 不变量:
/// - 非空，且语言部分（第一个 `-` 之前）非空
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale(String);

impl Locale {
    pub fn new(locale: impl Into<String>) -> Result<Self, &'static str> {
        let locale = locale.into();
        let trimmed = locale.trim();
        if trimmed.is_empty() {
            return Err("区域设置不能为空");
        }
        if trimmed.starts_with('-') {
            return Err("区域设置缺少语言部分");
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 语言前缀，如 "zh-CN" -> "zh"，供客户端按语言筛选
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// 是否属于给定语言前缀（大小写不敏感）
    pub fn matches_language(&self, prefix: &str) -> bool {
        self.0
            .to_ascii_lowercase()
            .starts_with(&prefix.to_ascii_lowercase())
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_backend() {
        assert_eq!(Gender::from_backend("Female"), Gender::Female);
        assert_eq!(Gender::from_backend("male"), Gender::Male);
        assert_eq!(Gender::from_backend("Neutral"), Gender::Unspecified);
        assert_eq!(Gender::from_backend(""), Gender::Unspecified);
    }

    #[test]
    fn test_locale_language() {
        let locale = Locale::new("zh-CN").unwrap();
        assert_eq!(locale.language(), "zh");
        assert!(locale.matches_language("zh"));
        assert!(locale.matches_language("ZH-cn"));
        assert!(!locale.matches_language("en"));

        let plain = Locale::new("en").unwrap();
        assert_eq!(plain.language(), "en");
    }

    #[test]
    fn test_locale_rejects_empty() {
        assert!(Locale::new("  ").is_err());
        assert!(Locale::new("-CN").is_err());
    }
}
