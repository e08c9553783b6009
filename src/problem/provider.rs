//! 問題データの取得
//!
//! 取得元はトレイトで抽象化し、セッション内では一度だけ取得する

use super::{ProblemContent, ProblemId};
use crate::error::ProblemError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 問題データの取得元
pub trait ProblemContentProvider {
    /// 問題の説明とスターターコードを取得
    fn fetch(&mut self, problem: &ProblemId) -> Result<ProblemContent, ProblemError>;
}

/// `<dir>/<id>.json` から問題データを読み込む取得元
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn content_path(&self, problem: &ProblemId) -> Result<PathBuf, ProblemError> {
        let id = problem.as_str();
        // 識別子をパスとして解釈させない
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(ProblemError::Fetch {
                problem: id.to_string(),
                reason: "invalid problem id".to_string(),
            });
        }
        Ok(self.root.join(format!("{id}.json")))
    }
}

impl ProblemContentProvider for DirectoryProvider {
    fn fetch(&mut self, problem: &ProblemId) -> Result<ProblemContent, ProblemError> {
        let path = self.content_path(problem)?;
        if !path.is_file() {
            return Err(ProblemError::Fetch {
                problem: problem.to_string(),
                reason: "not found".to_string(),
            });
        }

        let json = fs::read_to_string(&path).map_err(|err| ProblemError::Fetch {
            problem: problem.to_string(),
            reason: err.to_string(),
        })?;
        ProblemContent::from_json(&json)
    }
}

/// 取得結果をキャッシュする取得元
///
/// 成功した結果のみ保持し、失敗は次回の取得で再試行する。
pub struct CachedProvider<P> {
    inner: P,
    cache: HashMap<ProblemId, ProblemContent>,
}

impl<P: ProblemContentProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// キャッシュ済みの問題数
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: ProblemContentProvider> ProblemContentProvider for CachedProvider<P> {
    fn fetch(&mut self, problem: &ProblemId) -> Result<ProblemContent, ProblemError> {
        if let Some(content) = self.cache.get(problem) {
            return Ok(content.clone());
        }

        let content = self.inner.fetch(problem)?;
        log::debug!("cached problem content for {}", problem);
        self.cache.insert(problem.clone(), content.clone());
        Ok(content)
    }
}
