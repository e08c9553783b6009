//! 既定カーソル位置の推定
//!
//! 保存済みのカーソル位置が無い場合に、新しいコードを書き始めやすい位置を選ぶ

/// 挿入位置（文字オフセット）を推定
///
/// 空白のみ（または空）の行のうち、最も長い行の末尾を返す。
/// 同じ長さの行が複数ある場合は先に現れた行を採用する。
/// 該当行が無ければ 0 を返す。
pub fn find_insertion_point(text: &str) -> usize {
    let mut best: Option<(usize, usize)> = None;

    for (index, line) in text.split('\n').enumerate() {
        if !line.trim().is_empty() {
            continue;
        }
        let len = line.chars().count();
        match best {
            Some((_, best_len)) if best_len >= len => {}
            _ => best = Some((index, len)),
        }
    }

    let Some((target, target_len)) = best else {
        return 0;
    };

    // 前の行の長さ + 改行1文字ずつ、最後に対象行の長さ
    let preceding: usize = text
        .split('\n')
        .take(target)
        .map(|line| line.chars().count() + 1)
        .sum();
    preceding + target_len
}

/// オフセットをテキスト長（文字数）に収める
pub fn clamp_offset(offset: usize, text: &str) -> usize {
    offset.min(text.chars().count())
}
