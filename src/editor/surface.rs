//! 編集面との接続
//!
//! 表示中のテキストとカーソルは、必ず一つのトランザクションとして同時に反映する

use crate::language::{LanguageId, SyntaxGrammar};

/// 編集面へ一度に適用する更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceTransaction {
    /// 表示する言語
    pub language: LanguageId,
    /// ハイライトに使う文法
    pub grammar: SyntaxGrammar,
    /// 全置換するテキスト
    pub text: String,
    /// 適用後のカーソル位置（文字オフセット、テキスト長以内）
    pub cursor: usize,
}

/// 編集面
pub trait EditorSurface {
    /// テキスト全体とカーソルを一度に置き換える
    fn apply(&mut self, transaction: &SurfaceTransaction);

    /// 入力フォーカスを編集面へ移す
    fn focus(&mut self);

    /// 現在のカーソル位置（取得できない場合は `None`）
    fn cursor_offset(&self) -> Option<usize>;
}

/// 編集面の一回分の描画状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceFrame {
    pub language: LanguageId,
    pub grammar: SyntaxGrammar,
    pub text: String,
    pub cursor: usize,
}

/// メモリ上の編集面
///
/// ヘッドレス実行やテストで使う。適用された全フレームを記録する。
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    frames: Vec<SurfaceFrame>,
    cursor: Option<usize>,
    focused: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直近のフレーム
    pub fn current(&self) -> Option<&SurfaceFrame> {
        self.frames.last()
    }

    /// 適用された全フレーム
    pub fn frames(&self) -> &[SurfaceFrame] {
        &self.frames
    }

    pub fn text(&self) -> &str {
        self.current().map(|frame| frame.text.as_str()).unwrap_or("")
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// 利用者によるカーソル移動
    pub fn move_cursor(&mut self, offset: usize) {
        let len = self.text().chars().count();
        self.cursor = Some(offset.min(len));
    }

    /// 利用者による入力（テキスト全体を置き換え、カーソルを指定位置へ）
    ///
    /// 変更後のテキストを返すので、そのままコントローラへ渡せる。
    pub fn type_text(&mut self, text: &str, cursor: usize) -> String {
        if let Some(frame) = self.frames.last_mut() {
            frame.text = text.to_string();
            frame.cursor = cursor.min(text.chars().count());
            self.cursor = Some(frame.cursor);
        }
        text.to_string()
    }

    /// フォーカスを外す
    pub fn blur(&mut self) {
        self.focused = false;
    }
}

impl EditorSurface for MemorySurface {
    fn apply(&mut self, transaction: &SurfaceTransaction) {
        self.frames.push(SurfaceFrame {
            language: transaction.language,
            grammar: transaction.grammar,
            text: transaction.text.clone(),
            cursor: transaction.cursor,
        });
        self.cursor = Some(transaction.cursor);
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn cursor_offset(&self) -> Option<usize> {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(text: &str, cursor: usize) -> SurfaceTransaction {
        SurfaceTransaction {
            language: LanguageId::Python,
            grammar: SyntaxGrammar::Python,
            text: text.to_string(),
            cursor,
        }
    }

    #[test]
    fn test_apply_records_frame() {
        let mut surface = MemorySurface::new();
        assert_eq!(surface.cursor_offset(), None);

        surface.apply(&transaction("pass", 2));
        surface.focus();

        assert_eq!(surface.frames().len(), 1);
        assert_eq!(surface.text(), "pass");
        assert_eq!(surface.cursor_offset(), Some(2));
        assert!(surface.is_focused());
    }

    #[test]
    fn test_user_edits_update_current_frame() {
        let mut surface = MemorySurface::new();
        surface.apply(&transaction("pass", 0));

        let text = surface.type_text("return 1", 8);
        assert_eq!(text, "return 1");
        assert_eq!(surface.frames().len(), 1);
        assert_eq!(surface.cursor_offset(), Some(8));

        surface.move_cursor(100);
        assert_eq!(surface.cursor_offset(), Some(8));
    }
}
