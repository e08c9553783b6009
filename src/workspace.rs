//! 問題ビュー
//!
//! UI シェルへ公開する状態（選択中の言語・表示テキスト・実行結果・実行中フラグ・エラー）をまとめる

use crate::editor::{EditorSessionController, EditorSurface};
use crate::error::execution::Result as ExecutionResult;
use crate::error::{Result, SessionError};
use crate::execution::{ExecutionClient, ExecutionTransport, TestResult};
use crate::language::LanguageId;
use crate::problem::{ProblemContent, ProblemContentProvider, ProblemId};

/// 実行結果パネルの状態
///
/// エラーと結果は同時に表示しない。エラーが入ると結果は空になる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPanel {
    results: Vec<TestResult>,
    busy: bool,
    error: Option<String>,
}

/// 合格数の集計
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

impl RunPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 実行開始
    pub fn begin(&mut self) {
        self.busy = true;
        self.error = None;
        self.results.clear();
    }

    /// 実行完了
    pub fn finish(&mut self, outcome: ExecutionResult<Vec<TestResult>>) {
        self.busy = false;
        match outcome {
            Ok(results) => {
                self.error = None;
                self.results = results;
            }
            Err(err) => {
                self.results.clear();
                self.error = Some(err.user_message());
            }
        }
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 結果が無ければ `None`
    pub fn summary(&self) -> Option<RunSummary> {
        if self.results.is_empty() {
            return None;
        }
        Some(RunSummary {
            passed: self.results.iter().filter(|result| result.success).count(),
            total: self.results.len(),
        })
    }
}

/// 一つの問題を解く画面の状態
pub struct PracticeView<S: EditorSurface> {
    editor: EditorSessionController<S>,
    description: Option<String>,
    run: RunPanel,
}

impl<S: EditorSurface> PracticeView<S> {
    pub fn new(editor: EditorSessionController<S>) -> Self {
        Self {
            editor,
            description: None,
            run: RunPanel::new(),
        }
    }

    /// 問題データを取得してエディタを初期化
    pub fn open<P: ProblemContentProvider>(
        &mut self,
        provider: &mut P,
        problem: ProblemId,
    ) -> Result<()> {
        let content = provider.fetch(&problem)?;
        self.load(problem, content);
        Ok(())
    }

    /// 取得済みの問題データで初期化
    pub fn load(&mut self, problem: ProblemId, content: ProblemContent) {
        self.description = Some(content.description);
        self.run = RunPanel::new();
        self.editor.initialize(problem, content.starter_code);
    }

    /// 選択中の言語の表示テキストを提出
    ///
    /// 実行は同期的に完了するため、この経路では `is_busy()` が true の状態は
    /// 外から観測できない。実行を非同期に行うシェルは `RunPanel::begin` と
    /// `RunPanel::finish` を自分で呼び、その間の表示を `run_panel_mut` で更新する。
    pub fn submit<T: ExecutionTransport>(&mut self, client: &mut ExecutionClient<T>) -> Result<()> {
        let problem = self
            .editor
            .problem()
            .cloned()
            .ok_or(SessionError::NotInitialized)?;
        let language = self
            .editor
            .active_language()
            .ok_or(SessionError::NotInitialized)?;
        let code = self.editor.visible_text().unwrap_or_default().to_string();

        self.run.begin();
        let outcome = client.run(language, &problem, &code);
        self.run.finish(outcome);
        Ok(())
    }

    pub fn editor(&self) -> &EditorSessionController<S> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorSessionController<S> {
        &mut self.editor
    }

    pub fn run_panel(&self) -> &RunPanel {
        &self.run
    }

    pub fn run_panel_mut(&mut self) -> &mut RunPanel {
        &mut self.run
    }

    /// Markdown 形式の問題説明
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn active_language(&self) -> Option<LanguageId> {
        self.editor.active_language()
    }

    pub fn visible_text(&self) -> Option<&str> {
        self.editor.visible_text()
    }
}
