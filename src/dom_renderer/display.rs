//! `display` プロパティの判定
//!
//! ボタンの表示状態はインラインスタイルではなく計算済みスタイルで判断する。
//! スタイルシートで隠されたボタンも正しく扱うため。

/// ボタン要素の既定の display 値
pub const BUTTON_DISPLAY: &str = "inline-block";

/// 計算済みの display 値が表示状態かどうか
///
/// 文書に属さない要素では空文字になるので、非表示として扱う。
pub fn is_shown(computed_display: &str) -> bool {
    let display = computed_display.trim();
    !display.is_empty() && display != "none"
}

/// インライン指定を外した後の計算済み display 値から、追加で指定すべき値を決める
///
/// スタイルシートによってまだ隠れている場合だけ `Some` を返す。
pub fn display_to_show(computed_without_inline: &str) -> Option<&'static str> {
    if is_shown(computed_without_inline) {
        None
    } else {
        Some(BUTTON_DISPLAY)
    }
}
