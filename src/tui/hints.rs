// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Pythia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Pythia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

/// Generates `n` hint labels over `hint_chars`.
///
/// All labels share one length, so no label is a prefix of another and a label is complete as
/// soon as enough characters were typed. A single-character alphabet labels at most one target.
pub(crate) fn gen_labels(n: usize, hint_chars: &str) -> Vec<String> {
    let alphabet: Vec<char> = hint_chars.chars().collect();
    assert!(!alphabet.is_empty(), "hint_chars must not be empty");

    let mut seen = HashSet::with_capacity(alphabet.len());
    for &ch in &alphabet {
        if !seen.insert(ch) {
            panic!("hint_chars must not contain duplicate characters");
        }
    }

    if n == 0 {
        return Vec::new();
    }

    let k = alphabet.len();
    if n == 1 {
        return vec![alphabet[0].to_string()];
    }
    if k == 1 {
        return Vec::new();
    }

    let mut len = 1usize;
    let mut capacity = k;
    while capacity < n {
        capacity = capacity.saturating_mul(k);
        len += 1;
    }

    (0..n)
        .map(|i| {
            let mut x = i;
            let mut chars = vec![alphabet[0]; len];
            for pos in (0..len).rev() {
                chars[pos] = alphabet[x % k];
                x /= k;
            }
            chars.into_iter().collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::gen_labels;
    use std::collections::HashSet;

    #[test]
    fn gen_labels_n_le_k() {
        assert_eq!(gen_labels(3, "abc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn gen_labels_grow_uniformly() {
        assert_eq!(gen_labels(4, "abc"), vec!["aa", "ab", "ac", "ba"]);
    }

    #[test]
    fn gen_labels_are_prefix_free() {
        let labels = gen_labels(30, "sadfjklewcmpgh");
        assert_eq!(labels.len(), 30);

        let mut uniq = HashSet::with_capacity(labels.len());
        for label in &labels {
            assert!(uniq.insert(label.as_str()), "duplicate label: {label}");
            assert_eq!(label.chars().count(), 2);
        }
        for a in &labels {
            for b in &labels {
                assert!(a == b || !b.starts_with(a.as_str()), "{a} is a prefix of {b}");
            }
        }
        assert_eq!(&labels[..3], ["ss", "sa", "sd"]);
    }

    #[test]
    fn single_label_uses_one_char() {
        assert_eq!(gen_labels(1, "x"), vec!["x"]);
        assert!(gen_labels(0, "ab").is_empty());
    }

    #[test]
    #[should_panic(expected = "hint_chars must not be empty")]
    fn gen_labels_empty_alphabet_panics() {
        let _ = gen_labels(1, "");
    }

    #[test]
    #[should_panic(expected = "hint_chars must not contain duplicate characters")]
    fn gen_labels_duplicate_chars_panics() {
        let _ = gen_labels(1, "abca");
    }

    #[test]
    fn gen_labels_unary_alphabet_yields_nothing_for_many() {
        assert!(gen_labels(2, "a").is_empty());
        assert!(gen_labels(40, "j").is_empty());
    }
}
