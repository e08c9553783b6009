//! 問題データ
//!
//! 問題の識別子・公開カタログ・説明文とスターターコード

pub mod provider;

pub use provider::{CachedProvider, DirectoryProvider, ProblemContentProvider};

use crate::error::ProblemError;
use crate::language::LanguageId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// 問題の識別子（セッションをまたいで不変）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 表示用タイトル（カタログに無い場合は識別子から生成）
    pub fn display_title(&self) -> String {
        match catalog_entry(self.as_str()) {
            Some(summary) => summary.title.to_string(),
            None => self.0.replace('_', " "),
        }
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProblemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProblemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// 公開カタログの一項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub difficulty: Difficulty,
}

// バックエンドに存在しても、ここに載せるまでは一覧に表示しない
const CATALOG: &[ProblemSummary] = &[
    ProblemSummary {
        id: "two_sum",
        title: "Two Sum",
        difficulty: Difficulty::Easy,
    },
    ProblemSummary {
        id: "add_list",
        title: "Add Numbers",
        difficulty: Difficulty::Easy,
    },
    ProblemSummary {
        id: "is_palindrome",
        title: "Is Palindrome",
        difficulty: Difficulty::Easy,
    },
];

/// 公開中の問題一覧
pub fn catalog() -> &'static [ProblemSummary] {
    CATALOG
}

/// 識別子からカタログ項目を検索
pub fn catalog_entry(id: &str) -> Option<&'static ProblemSummary> {
    CATALOG.iter().find(|summary| summary.id == id)
}

/// 言語ごとのスターターコード
///
/// 全言語分が揃っていることを構築時に保証するため、参照は失敗しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "HashMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct StarterCode {
    texts: [String; LanguageId::COUNT],
}

impl StarterCode {
    /// 言語 → テキストの対応から構築
    pub fn from_map(mut map: HashMap<LanguageId, String>) -> Result<Self, ProblemError> {
        let mut texts: [String; LanguageId::COUNT] = Default::default();
        for lang in LanguageId::ALL {
            texts[lang.index()] =
                map.remove(&lang)
                    .ok_or_else(|| ProblemError::MissingStarterCode {
                        language: lang.as_str().to_string(),
                    })?;
        }
        Ok(Self { texts })
    }

    /// 全言語に同じテキストを使う
    pub fn uniform(text: &str) -> Self {
        Self {
            texts: std::array::from_fn(|_| text.to_string()),
        }
    }

    pub fn get(&self, language: LanguageId) -> &str {
        &self.texts[language.index()]
    }

    /// 一言語分を差し替え
    pub fn with(mut self, language: LanguageId, text: impl Into<String>) -> Self {
        self.texts[language.index()] = text.into();
        self
    }
}

impl TryFrom<HashMap<String, String>> for StarterCode {
    type Error = ProblemError;

    fn try_from(raw: HashMap<String, String>) -> Result<Self, Self::Error> {
        // 未対応言語のキーは無視する
        let map = raw
            .into_iter()
            .filter_map(|(name, text)| name.parse::<LanguageId>().ok().map(|lang| (lang, text)))
            .collect();
        Self::from_map(map)
    }
}

impl From<StarterCode> for BTreeMap<String, String> {
    fn from(starter: StarterCode) -> Self {
        LanguageId::ALL
            .into_iter()
            .zip(starter.texts)
            .map(|(lang, text)| (lang.as_str().to_string(), text))
            .collect()
    }
}

/// 問題の説明とスターターコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemContent {
    /// Markdown 形式の説明文
    pub description: String,
    pub starter_code: StarterCode,
}

impl ProblemContent {
    pub fn from_json(json: &str) -> Result<Self, ProblemError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_json() -> String {
        r#"{
            "description": "Return indices of two numbers adding to target.",
            "starterCode": {
                "python": "def two_sum(nums, target):\n    pass\n",
                "javascript": "function twoSum(nums, target) {\n}\n",
                "cpp": "vector<int> twoSum() {}\n",
                "java": "class Solution {}\n",
                "csharp": "class Solution {}\n",
                "go": "func twoSum() {}\n",
                "rust": "fn two_sum() {}\n"
            }
        }"#
        .to_string()
    }

    #[test]
    fn test_content_parses_all_languages() {
        let content = ProblemContent::from_json(&full_json()).unwrap();
        assert!(content.description.starts_with("Return indices"));
        assert_eq!(
            content.starter_code.get(LanguageId::Go),
            "func twoSum() {}\n"
        );
    }

    #[test]
    fn test_missing_language_is_rejected() {
        let json = r#"{"description": "", "starterCode": {"python": "pass"}}"#;
        let error = ProblemContent::from_json(json).unwrap_err();
        match error {
            ProblemError::Parse { message } => assert!(message.contains("javascript")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_starter_serializes_as_map() {
        let starter = StarterCode::uniform("x").with(LanguageId::Java, "class A {}");
        let json = serde_json::to_value(&starter).unwrap();
        assert_eq!(json["java"], "class A {}");
        assert_eq!(json["go"], "x");
    }

    #[test]
    fn test_catalog_titles() {
        assert_eq!(catalog().len(), 3);
        assert_eq!(ProblemId::from("add_list").display_title(), "Add Numbers");
        assert_eq!(ProblemId::from("merge_intervals").display_title(), "merge intervals");
        assert_eq!(catalog_entry("two_sum").map(|p| p.difficulty), Some(Difficulty::Easy));
    }
}
