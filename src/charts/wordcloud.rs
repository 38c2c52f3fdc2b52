//! Word Cloud Layout
//! Word frequencies and spiral placement; drawing happens in the renderer.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

pub const CLOUD_WIDTH: u32 = 800;
pub const CLOUD_HEIGHT: u32 = 400;
pub const MAX_WORDS: usize = 200;
pub const MIN_FONT_SIZE: f64 = 8.0;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w[\w']+").expect("valid token pattern"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "could", "did", "didn't", "do", "does",
        "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few", "for",
        "from", "further", "get", "had", "has", "hasn't", "have", "haven't", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if",
        "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "me", "more", "most",
        "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
        "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "shall", "she",
        "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
        "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
        "while", "who", "whom", "why", "with", "won't", "would", "you", "your", "yours",
        "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// A word with its frequency, in the casing it most often appears with.
#[derive(Debug, Clone, PartialEq)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

/// A word positioned on the canvas (top-left anchor).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f64,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Rank in frequency order, used to pick the colour.
    pub rank: usize,
}

#[derive(Default)]
struct Tally {
    count: usize,
    first_seen: usize,
    forms: HashMap<String, usize>,
}

impl Tally {
    /// Most frequent casing; ties go to the lexicographically smallest form.
    fn best_form(&self) -> String {
        self.forms
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(form, _)| form.clone())
            .unwrap_or_default()
    }
}

/// Count words in `text`: case-insensitive, stopwords and numbers dropped,
/// trailing `'s` removed, plurals folded into their singular when both occur.
/// Sorted by count descending, ties in first-appearance order.
pub fn word_frequencies(text: &str) -> Vec<WordFrequency> {
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    for (position, m) in TOKEN.find_iter(text).enumerate() {
        let mut token = m.as_str();
        if token.to_lowercase().ends_with("'s") {
            token = &token[..token.len() - 2];
        }
        let lower = token.to_lowercase();
        if token.chars().count() < 2
            || STOPWORDS.contains(lower.as_str())
            || token.chars().all(|c| c.is_ascii_digit())
        {
            continue;
        }
        let tally = tallies.entry(lower).or_insert_with(|| Tally {
            first_seen: position,
            ..Tally::default()
        });
        tally.count += 1;
        *tally.forms.entry(token.to_string()).or_insert(0) += 1;
    }

    let plurals: Vec<String> = tallies
        .keys()
        .filter(|k| k.ends_with('s') && !k.ends_with("ss"))
        .filter(|k| tallies.contains_key(&k[..k.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some(folded) = tallies.remove(&plural) {
            if let Some(singular) = tallies.get_mut(&plural[..plural.len() - 1]) {
                singular.count += folded.count;
                singular.first_seen = singular.first_seen.min(folded.first_seen);
            }
        }
    }

    let mut words: Vec<(usize, WordFrequency)> = tallies
        .values()
        .map(|t| {
            (
                t.first_seen,
                WordFrequency {
                    word: t.best_form(),
                    count: t.count,
                },
            )
        })
        .collect();
    words.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.0.cmp(&b.0)));
    words.into_iter().map(|(_, w)| w).collect()
}

/// Starting font size: half fixed, half proportional to relative frequency.
pub fn font_size_for(count: usize, max_count: usize, max_font_size: f64) -> f64 {
    if max_count == 0 {
        return MIN_FONT_SIZE;
    }
    let relative = count as f64 / max_count as f64;
    (max_font_size * (0.5 + 0.5 * relative)).max(MIN_FONT_SIZE)
}

fn overlaps(a: &PlacedWord, x: i32, y: i32, w: u32, h: u32) -> bool {
    x < a.x + a.width as i32
        && a.x < x + w as i32
        && y < a.y + a.height as i32
        && a.y < y + h as i32
}

/// Place words along an Archimedean spiral from the canvas centre.
///
/// `measure` returns the pixel size of a word at a font size. A word that does
/// not fit is retried at 90% of its size down to [`MIN_FONT_SIZE`], then skipped.
pub fn layout_words<E>(
    words: &[WordFrequency],
    width: u32,
    height: u32,
    mut measure: impl FnMut(&str, f64) -> Result<(u32, u32), E>,
) -> Result<Vec<PlacedWord>, E> {
    let max_count = words.first().map(|w| w.count).unwrap_or(0);
    let max_font_size = height as f64 / 4.0;
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let aspect = width as f64 / height.max(1) as f64;
    let max_radius = (cx * cx + cy * cy).sqrt();

    let mut placed: Vec<PlacedWord> = Vec::new();

    for (rank, wf) in words.iter().take(MAX_WORDS).enumerate() {
        let mut size = font_size_for(wf.count, max_count, max_font_size);
        'sizes: while size >= MIN_FONT_SIZE {
            let (w, h) = measure(&wf.word, size)?;
            if w <= width && h <= height {
                let mut step = 0.0f64;
                loop {
                    let radius = 2.0 * step;
                    if radius > max_radius {
                        break;
                    }
                    let angle = step * 0.5;
                    let x = (cx + radius * aspect.sqrt() * angle.cos() - w as f64 / 2.0) as i32;
                    let y = (cy + radius / aspect.sqrt() * angle.sin() - h as f64 / 2.0) as i32;
                    let inside = x >= 0
                        && y >= 0
                        && x + w as i32 <= width as i32
                        && y + h as i32 <= height as i32;
                    if inside && !placed.iter().any(|p| overlaps(p, x, y, w, h)) {
                        placed.push(PlacedWord {
                            word: wf.word.clone(),
                            font_size: size,
                            x,
                            y,
                            width: w,
                            height: h,
                            rank,
                        });
                        break 'sizes;
                    }
                    step += 0.25;
                }
            }
            size *= 0.9;
        }
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn approx_measure(word: &str, size: f64) -> Result<(u32, u32), Infallible> {
        Ok(((word.len() as f64 * size * 0.6) as u32, size as u32))
    }

    #[test]
    fn test_word_frequencies_drops_stopwords_and_numbers() {
        let freqs = word_frequencies("The Love of Love 2 and the Love Song 1984");
        assert_eq!(freqs[0], WordFrequency { word: "Love".to_string(), count: 3 });
        assert!(freqs.iter().all(|w| w.word.to_lowercase() != "the"));
        assert!(freqs.iter().all(|w| w.word != "1984"));
        assert_eq!(freqs.len(), 2);
    }

    #[test]
    fn test_word_frequencies_folds_plurals_and_possessives() {
        let freqs = word_frequencies("Ghost Ghosts Ghost's Story stories");
        assert_eq!(freqs[0].word, "Ghost");
        assert_eq!(freqs[0].count, 3);
        // "stories" is not a simple plural of "story"
        assert_eq!(freqs.len(), 3);
    }

    #[test]
    fn test_word_frequencies_ties_keep_first_appearance() {
        let freqs = word_frequencies("zebra apple zebra apple mango");
        let words: Vec<&str> = freqs.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_font_size_scaling() {
        assert_eq!(font_size_for(10, 10, 100.0), 100.0);
        assert_eq!(font_size_for(0, 10, 100.0), 50.0);
        assert_eq!(font_size_for(1, 0, 100.0), MIN_FONT_SIZE);
    }

    #[test]
    fn test_layout_words_no_overlap_and_inside() {
        let freqs = word_frequencies(
            "Love Love Love Christmas Christmas Story Story Life Man World Girl Night Day Dead",
        );
        let placed = layout_words(&freqs, CLOUD_WIDTH, CLOUD_HEIGHT, approx_measure).unwrap();
        assert_eq!(placed.len(), freqs.len());
        for (i, a) in placed.iter().enumerate() {
            assert!(a.x >= 0 && a.y >= 0);
            assert!(a.x + a.width as i32 <= CLOUD_WIDTH as i32);
            assert!(a.y + a.height as i32 <= CLOUD_HEIGHT as i32);
            for b in placed.iter().skip(i + 1) {
                assert!(!overlaps(a, b.x, b.y, b.width, b.height));
            }
        }
        assert_eq!(placed[0].word, "Love");
        assert!(placed[0].font_size >= placed[placed.len() - 1].font_size);
    }

    #[test]
    fn test_layout_skips_word_that_never_fits() {
        let freqs = vec![WordFrequency { word: "x".repeat(500), count: 1 }];
        let placed = layout_words(&freqs, 100, 50, approx_measure).unwrap();
        assert!(placed.is_empty());
    }
}
