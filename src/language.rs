//! 対応言語の定義
//!
//! 言語集合はコンパイル時に確定した閉じた列挙型として扱う

use crate::error::ProblemError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 解答に使用できる言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageId {
    Python,
    JavaScript,
    Cpp,
    Java,
    CSharp,
    Go,
}

impl LanguageId {
    /// 言語数
    pub const COUNT: usize = 6;

    /// 宣言順の全言語（先頭が既定言語）
    pub const ALL: [LanguageId; Self::COUNT] = [
        LanguageId::Python,
        LanguageId::JavaScript,
        LanguageId::Cpp,
        LanguageId::Java,
        LanguageId::CSharp,
        LanguageId::Go,
    ];

    /// 既定の言語
    pub const PRIMARY: LanguageId = LanguageId::Python;

    /// `ALL` 内での位置
    pub fn index(self) -> usize {
        self as usize
    }

    /// ストレージキーや通信で使う識別子
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageId::Python => "python",
            LanguageId::JavaScript => "javascript",
            LanguageId::Cpp => "cpp",
            LanguageId::Java => "java",
            LanguageId::CSharp => "csharp",
            LanguageId::Go => "go",
        }
    }

    /// 表示名
    pub fn label(self) -> &'static str {
        match self {
            LanguageId::Python => "Python",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::CSharp => "C#",
            LanguageId::Go => "Go",
        }
    }
}

impl Default for LanguageId {
    fn default() -> Self {
        Self::PRIMARY
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageId {
    type Err = ProblemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageId::ALL
            .into_iter()
            .find(|lang| lang.as_str() == s)
            .ok_or_else(|| ProblemError::UnknownLanguage {
                name: s.to_string(),
            })
    }
}

/// ハイライトに使う文法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxGrammar {
    Python,
    JavaScript,
    Cpp,
    Java,
}

/// 言語 → 文法の対応表
///
/// C# と Go は専用の文法を持たず、既定では Java / C++ の文法を借用する。
/// 差し替え可能な独立した表として保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationTable {
    grammars: [SyntaxGrammar; LanguageId::COUNT],
}

impl PresentationTable {
    /// 指定言語の文法を取得
    pub fn grammar(&self, language: LanguageId) -> SyntaxGrammar {
        self.grammars[language.index()]
    }

    /// 一言語分の対応を上書き
    pub fn with_override(mut self, language: LanguageId, grammar: SyntaxGrammar) -> Self {
        self.grammars[language.index()] = grammar;
        self
    }
}

impl Default for PresentationTable {
    fn default() -> Self {
        Self {
            grammars: [
                SyntaxGrammar::Python,
                SyntaxGrammar::JavaScript,
                SyntaxGrammar::Cpp,
                SyntaxGrammar::Java,
                SyntaxGrammar::Java,
                SyntaxGrammar::Cpp,
            ],
        }
    }
}
