//! Display-title selection for multilingual metadata.
//!
//! External sources hand back several title variants per entry
//! (localized, romanized, native script). The picker scores each by how
//! much it looks like English text and selects one deterministically.

#[derive(Debug, Clone, PartialEq)]
pub struct TitleChoice {
    pub key: String,
    pub title: String,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct TitleOptions {
    /// Keys considered first, e.g. the source's explicit English column.
    pub preferred: Vec<String>,
    /// Walked in order when nothing clears the score threshold.
    pub fallback: Vec<String>,
    pub min_score: f32,
}

impl Default for TitleOptions {
    fn default() -> Self {
        TitleOptions {
            preferred: vec!["en".to_string(), "title_english".to_string()],
            fallback: vec![
                "ja-ro".to_string(),
                "title_romaji".to_string(),
                "ja".to_string(),
                "title_native".to_string(),
            ],
            min_score: 0.5,
        }
    }
}

/// Pick the best display title among `candidates`.
///
/// Candidates are `(key, value)` pairs in source order. Selection:
/// preferred keys first, then any key, both gated on `min_score`; then
/// the fallback key order regardless of score; then the overall best as
/// a last resort. Ties on score keep the first-seen candidate.
pub fn pick_title(
    candidates: &[(String, Option<String>)],
    options: &TitleOptions,
) -> Option<TitleChoice> {
    let scored: Vec<(usize, &str, &str, f32)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, (key, value))| {
            let value = value.as_deref()?.trim();
            if value.is_empty() {
                return None;
            }
            Some((index, key.as_str(), value, english_likelihood(value)))
        })
        .collect();

    if scored.is_empty() {
        return None;
    }

    let preferred_best = scored
        .iter()
        .filter(|(_, key, _, _)| options.preferred.iter().any(|p| p == key))
        .reduce(|best, entry| if entry.3 > best.3 { entry } else { best });
    if let Some(&(_, key, title, score)) = preferred_best {
        if score >= options.min_score {
            return Some(choice(key, title, score));
        }
    }

    let overall_best = scored
        .iter()
        .reduce(|best, entry| if entry.3 > best.3 { entry } else { best })
        .copied();
    if let Some((_, key, title, score)) = overall_best {
        if score >= options.min_score {
            return Some(choice(key, title, score));
        }
    }

    for fallback_key in &options.fallback {
        if let Some(&(_, key, title, score)) =
            scored.iter().find(|(_, key, _, _)| key == fallback_key)
        {
            return Some(choice(key, title, score));
        }
    }

    overall_best.map(|(_, key, title, score)| choice(key, title, score))
}

fn choice(key: &str, title: &str, score: f32) -> TitleChoice {
    TitleChoice {
        key: key.to_string(),
        title: title.to_string(),
        score,
    }
}

/// Heuristic score in [0,1]: the share of letters that are ASCII, with a
/// penalty for CJK/kana/hangul and a small bonus for multi-word ASCII
/// strings. Empty input scores 0.
pub fn english_likelihood(text: &str) -> f32 {
    let mut letters = 0u32;
    let mut ascii_letters = 0u32;
    let mut non_latin = 0u32;

    for ch in text.chars() {
        if ch.is_whitespace() || ch.is_ascii_digit() || ch.is_ascii_punctuation() {
            continue;
        }
        letters += 1;
        if ch.is_ascii_alphabetic() {
            ascii_letters += 1;
        } else if is_non_latin_script(ch) {
            non_latin += 1;
        }
    }

    if letters == 0 {
        return 0.0;
    }

    let mut score = ascii_letters as f32 / letters as f32;
    score -= 0.3 * (non_latin as f32 / letters as f32);

    if non_latin == 0 && ascii_letters > 0 && text.trim().contains(' ') {
        score += 0.1;
    }

    score.clamp(0.0, 1.0)
}

fn is_non_latin_script(ch: char) -> bool {
    matches!(ch as u32,
        0x3040..=0x30FF      // hiragana, katakana
        | 0x3400..=0x4DBF    // CJK extension A
        | 0x4E00..=0x9FFF    // CJK unified
        | 0xAC00..=0xD7AF    // hangul
        | 0x0400..=0x04FF    // cyrillic
        | 0xFF00..=0xFFEF    // fullwidth forms
    )
}
