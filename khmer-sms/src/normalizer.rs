//! Khmer-aware text normalization
//!
//! Messages are cleaned before they reach a model: decorative symbols, emoji
//! and currency signs are dropped, Khmer script and ordinary letters, digits
//! and punctuation are kept, and whitespace is folded to single spaces.
//!
//! Filtering works on grapheme clusters, so a kept base letter keeps its
//! combining marks (`"cafe\u{301}"`, Thai and Devanagari vowel signs) while a
//! dropped symbol takes its marks with it.

use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

/// The Khmer Unicode block
pub const KHMER_RANGE: RangeInclusive<char> = '\u{1780}'..='\u{17FF}';

/// Anything that is not Khmer, a letter, a number, punctuation or whitespace
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\x{1780}-\x{17FF}\p{L}\p{N}\p{P}\s]+").expect("valid character filter")
});

static COMBINING_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{M}$").expect("valid mark pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Normalize a raw message for classification.
///
/// Filtering runs before whitespace folding, so a dropped symbol never leaves
/// a double or leading space behind. Dropping a cluster can strand the marks
/// of its neighbour, so passes repeat until the text stops changing; every
/// pass only removes characters or turns whitespace into plain spaces.
pub fn normalize_khmer_text(text: &str) -> String {
    let mut current = normalize_pass(text);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let mut filtered = String::with_capacity(text.len());
    for cluster in text.graphemes(true) {
        push_filtered_cluster(cluster, &mut filtered);
    }

    let collapsed = WHITESPACE_RUN.replace_all(&filtered, " ");
    collapsed.trim().to_string()
}

/// Append what survives of one grapheme cluster
fn push_filtered_cluster(cluster: &str, out: &mut String) {
    let mut chars = cluster.chars();
    let Some(first) = chars.next() else {
        return;
    };

    if first.is_whitespace() {
        out.push(' ');
        return;
    }
    if !is_retained_char(first) {
        return;
    }

    out.push(first);
    out.extend(chars.filter(|&c| is_retained_char(c) || is_combining_mark(c)));
}

/// Whether `c` survives normalization on its own
pub fn is_retained_char(c: char) -> bool {
    if KHMER_RANGE.contains(&c) {
        return true;
    }
    let mut buf = [0u8; 4];
    !DISALLOWED.is_match(c.encode_utf8(&mut buf))
}

/// Whether a grapheme cluster is kept: its leading character decides
pub fn is_retained_cluster(cluster: &str) -> bool {
    cluster.chars().next().is_some_and(is_retained_char)
}

fn is_combining_mark(c: char) -> bool {
    let mut buf = [0u8; 4];
    COMBINING_MARK.is_match(c.encode_utf8(&mut buf))
}

/// Value wrapper around [`normalize_khmer_text`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, text: &str) -> String {
        normalize_khmer_text(text)
    }
}
