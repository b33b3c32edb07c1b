/// テキスト処理ユーティリティ。
///
/// 空白正規化、抜粋フィンガープリント、語数カウント、証拠スニペット切り出しを提供します。
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;
use xxhash_rust::xxh3::xxh3_64;

/// フィンガープリントに使う抜粋先頭の文字数。
pub const FINGERPRINT_PREFIX_CHARS: usize = 50;

/// テキストをXXH3でハッシュする。
#[must_use]
pub fn hash_text(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// NFC正規化したうえで連続する空白を1つにまとめ、前後を削る。
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.nfc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 抜粋の近似重複キーを返す。
///
/// 先頭50文字を小文字化し、空白の連続を1つにまとめて前後を削ったものをハッシュする。
/// OCR由来の改行や空白の揺れだけが違う抜粋は同じキーになる。
/// 50文字未満の抜粋はそのまま全体を使う。空の抜粋は `None`。
#[must_use]
pub fn excerpt_fingerprint(excerpt: &str) -> Option<u64> {
    let prefix: String = excerpt.chars().take(FINGERPRINT_PREFIX_CHARS).collect();
    let key = normalize_whitespace(&prefix.to_lowercase());
    if key.is_empty() {
        return None;
    }
    Some(hash_text(&key))
}

/// Unicode UAX#29 の単語境界で語数を数える。
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.unicode_words().count()
}

/// バイト範囲 `start..end` の前後 `radius` 文字を含むスニペットを切り出す。
///
/// 範囲は文字境界に揃えられる。切り詰めた側には `…` を付ける。
#[must_use]
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> String {
    let start = start.min(text.len());
    let end = end.clamp(start, text.len());

    let window_start = text[..start]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map_or(0, |(idx, _)| idx);
    let window_end = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(idx, _)| end + idx);

    let mut snippet = String::with_capacity(window_end - window_start + 6);
    if window_start > 0 {
        snippet.push('…');
    }
    snippet.push_str(text[window_start..window_end].trim());
    if window_end < text.len() {
        snippet.push('…');
    }
    snippet
}
