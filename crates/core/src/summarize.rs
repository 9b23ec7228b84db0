//! Extractive summarization by word-frequency sentence scoring.
//!
//! Words are counted across the whole text (stop-words and punctuation
//! excluded), each sentence scores the sum of its words' counts, and the
//! highest scoring sentences are returned verbatim.

use crate::{Section, SlideItem};
use std::collections::{HashMap, HashSet};

/// Standard English stop-word list.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Abbreviations whose trailing period does not end a sentence (lowercase, no final period).
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "fig", "figs",
    "al", "eq", "approx", "cf",
];

/// Characters that end a sentence.
const TERMINATORS: &[char] = &['.', '!', '?'];

/// Closing characters that may trail a terminator and still belong to the sentence.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

/// Apostrophe-like characters that introduce an English clitic.
const APOSTROPHE_CHARS: &[char] = &['\'', '\u{2019}'];

/// Split text into sentences.
///
/// A sentence ends at `.`, `!` or `?` (plus any closing quotes or brackets)
/// followed by whitespace or the end of text. A period after a known
/// abbreviation or a single capital initial does not end a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !TERMINATORS.contains(&c) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (TERMINATORS.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1)) {
            j += 1;
        }

        let end = chars.get(j).map_or(text.len(), |&(p, _)| p);
        let at_boundary = chars.get(j).map_or(true, |&(_, next)| next.is_whitespace());
        let abbreviated = c == '.' && ends_with_abbreviation(&text[start..pos]);

        if at_boundary && !abbreviated {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
        i = j;
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

/// Whether the text right before a period is an abbreviation or an initial.
fn ends_with_abbreviation(prefix: &str) -> bool {
    let Some(token) = prefix.split_whitespace().last() else {
        return false;
    };
    let token = token.trim_start_matches(|c: char| !c.is_alphanumeric());

    let mut chars = token.chars();
    if let (Some(only), None) = (chars.next(), chars.next()) {
        if only.is_uppercase() {
            return true;
        }
    }

    ABBREVIATIONS.contains(&token.to_lowercase().as_str())
}

/// Split text into lowercase word and punctuation tokens.
///
/// Alphanumeric runs are words, English clitics are split off
/// ("don't" becomes "do" + "n't", "it's" becomes "it" + "'s") and every other
/// non-space character is a token of its own.
pub fn tokenize_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if !c.is_alphanumeric() {
            tokens.push(c.to_string());
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_alphanumeric() {
            i += 1;
        }
        let word: String = chars[start..i].iter().collect();

        let has_clitic = i + 1 < chars.len()
            && APOSTROPHE_CHARS.contains(&chars[i])
            && chars[i + 1].is_alphabetic();
        if !has_clitic {
            tokens.push(word);
            continue;
        }

        let clitic_start = i + 1;
        let mut k = clitic_start;
        while k < chars.len() && chars[k].is_alphanumeric() {
            k += 1;
        }
        let clitic: String = chars[clitic_start..k].iter().collect();

        if clitic == "t" && word.len() > 1 && word.ends_with('n') {
            tokens.push(word[..word.len() - 1].to_string());
            tokens.push("n't".to_string());
        } else {
            tokens.push(word);
            tokens.push(format!("'{clitic}"));
        }
        i = k;
    }

    tokens
}

/// Frequency-based extractive summarizer.
#[derive(Debug, Clone)]
pub struct Summarizer {
    stop_words: HashSet<&'static str>,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Summarizer {
    /// Create a summarizer using the English stop-word list.
    pub fn new() -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Whether a token takes part in frequency counting.
    fn is_content_word(&self, token: &str) -> bool {
        !token.is_empty()
            && token.chars().all(char::is_alphanumeric)
            && !self.stop_words.contains(token)
    }

    /// Count content words across the whole text.
    fn word_frequencies(&self, text: &str) -> HashMap<String, usize> {
        let mut frequencies = HashMap::new();
        for token in tokenize_words(text) {
            if self.is_content_word(&token) {
                *frequencies.entry(token).or_insert(0) += 1;
            }
        }
        frequencies
    }

    /// Score every distinct sentence, best first.
    ///
    /// Repeated sentences are merged and their scores accumulate. Equal
    /// scores keep document order.
    pub fn rank_sentences<'a>(&self, text: &'a str) -> Vec<(&'a str, usize)> {
        let frequencies = self.word_frequencies(text);
        let mut ranked: Vec<(&'a str, usize)> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();

        for sentence in split_sentences(text) {
            let score: usize = tokenize_words(sentence)
                .iter()
                .filter_map(|w| frequencies.get(w))
                .sum();

            match positions.get(sentence) {
                Some(&idx) => ranked[idx].1 += score,
                None => {
                    positions.insert(sentence, ranked.len());
                    ranked.push((sentence, score));
                }
            }
        }

        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `max_sentences` highest scoring sentences, verbatim.
    pub fn summary_sentences<'a>(&self, text: &'a str, max_sentences: usize) -> Vec<&'a str> {
        self.rank_sentences(text)
            .into_iter()
            .take(max_sentences)
            .map(|(sentence, _)| sentence)
            .collect()
    }

    /// Extractive summary of at most `max_sentences` sentences joined by spaces.
    pub fn extractive_summary(&self, text: &str, max_sentences: usize) -> String {
        self.summary_sentences(text, max_sentences).join(" ")
    }

    /// Derive the headline, bullets and note of a slide from a section.
    ///
    /// Bullets come from the two-sentence summary split on literal periods,
    /// so decimals and abbreviations inside it are split too.
    pub fn make_slide_text(&self, section: &Section) -> SlideItem {
        let text = section.text.as_str();

        let title = section.title.trim();
        let headline = if title.is_empty() {
            self.extractive_summary(text, 1)
        } else {
            title.to_string()
        };

        let bullets = self
            .extractive_summary(text, 2)
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(2)
            .map(String::from)
            .collect();

        let note = self.extractive_summary(text, 1);

        SlideItem {
            headline: headline.trim().to_string(),
            bullets,
            note: note.trim().to_string(),
        }
    }
}
