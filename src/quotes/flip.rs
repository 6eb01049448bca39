// Flipped (sarcastic) quote generation.
// Every card has a back side; quotes from the feed without one get a generated variant.

use rand::Rng;
use rand::seq::SliceRandom;

use super::types::Quote;

const SUFFIXES: [&str; 10] = [
    "...or so they say",
    "...said no one ever",
    "...in your dreams",
    "...yeah right",
    "...if only it were that simple",
    "...easier said than done",
    "...sure, let me get right on that",
    "...welcome to reality",
    "...in a perfect world maybe",
    "...that's adorable",
];

const PREFIXES: [&str; 5] = [
    "Obviously, ",
    "Clearly, ",
    "Of course, ",
    "Naturally, ",
    "Apparently, ",
];

/// Whole-word swaps, matched case-insensitively.
const ANTONYMS: [(&str, &str); 6] = [
    ("success", "failure"),
    ("always", "never"),
    ("possible", "impossible"),
    ("can", "cannot"),
    ("will", "will not"),
    ("yes", "no"),
];

/// Generate a sarcastic variant of `text` using one of four patterns chosen at random.
pub fn flip_quote<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    match rng.gen_range(0..4) {
        0 => {
            let suffix = SUFFIXES.choose(rng).copied().unwrap_or(SUFFIXES[0]);
            format!("{} {}", text, suffix)
        }
        1 => {
            let prefix = PREFIXES.choose(rng).copied().unwrap_or(PREFIXES[0]);
            format!("{}{}", prefix, text)
        }
        2 => swap_antonyms(text),
        _ => format!("The opposite of '{}' is probably true", text),
    }
}

/// Give every quote lacking a flipped variant a generated one. Existing variants are kept.
pub fn fill_flipped<R: Rng + ?Sized>(quotes: &mut [Quote], rng: &mut R) {
    for quote in quotes.iter_mut().filter(|q| q.flipped_quote.is_none()) {
        quote.flipped_quote = Some(flip_quote(&quote.quote, rng));
    }
}

/// Replace each antonym-table word in `text`, keeping a leading capital.
pub(crate) fn swap_antonyms(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (c.is_alphabetic(), word_start) {
            (true, None) => word_start = Some(i),
            (false, Some(start)) => {
                push_word(&mut out, &text[start..i]);
                word_start = None;
                out.push(c);
            }
            (false, None) => out.push(c),
            (true, Some(_)) => {}
        }
    }
    if let Some(start) = word_start {
        push_word(&mut out, &text[start..]);
    }

    out
}

fn push_word(out: &mut String, word: &str) {
    let lower = word.to_lowercase();
    let Some((_, replacement)) = ANTONYMS.iter().find(|(from, _)| *from == lower) else {
        out.push_str(word);
        return;
    };

    if word.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    } else {
        out.push_str(replacement);
    }
}
