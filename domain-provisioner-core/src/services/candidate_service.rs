//! 候选域名生成

/// 最多返回的候选数
const MAX_CANDIDATES: usize = 15;
const MIN_LABEL_LEN: usize = 3;
const MAX_LABEL_LEN: usize = 24;

const FILLER_WORDS: &[&str] = &["the", "and", "of", "&"];
const GENERIC_SUFFIXES: &[&str] = &["online", "shop", "store", "hub", "india"];

/// Split into lowercase ASCII alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .map(str::to_ascii_lowercase)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Derive registrable labels (no TLD) from a business name and optional city.
///
/// Order: joined words, joined + city, first word + city, initials + last word,
/// initials + city, first word, then joined and first word with generic
/// suffixes. Labels outside 3..=24 characters are dropped, duplicates keep their
/// first position, and at most 15 are returned.
pub fn generate_candidates(business_name: &str, city: Option<&str>) -> Vec<String> {
    let all_words = words(business_name);
    let meaningful: Vec<String> = all_words
        .iter()
        .filter(|w| !FILLER_WORDS.contains(&w.as_str()))
        .cloned()
        .collect();
    // 全是虚词时保留原词
    let words = if meaningful.is_empty() {
        all_words
    } else {
        meaningful
    };
    let (Some(first), Some(last)) = (words.first(), words.last()) else {
        return Vec::new();
    };

    let joined = words.concat();
    let city = city.map(words_of_city).filter(|c| !c.is_empty());
    let initials: String = words.iter().filter_map(|w| w.chars().next()).collect();
    let multi_word = words.len() > 1;

    let mut variants = vec![joined.clone()];
    if let Some(city) = &city {
        variants.push(format!("{joined}{city}"));
        variants.push(format!("{first}{city}"));
    }
    if multi_word {
        variants.push(format!("{initials}{last}"));
        if let Some(city) = &city {
            variants.push(format!("{initials}{city}"));
        }
    }
    variants.push(first.clone());
    variants.extend(GENERIC_SUFFIXES.iter().map(|s| format!("{joined}{s}")));
    if multi_word {
        variants.extend(GENERIC_SUFFIXES.iter().map(|s| format!("{first}{s}")));
    }

    let mut candidates: Vec<String> = Vec::with_capacity(MAX_CANDIDATES);
    for label in variants {
        if !(MIN_LABEL_LEN..=MAX_LABEL_LEN).contains(&label.len()) || candidates.contains(&label) {
            continue;
        }
        candidates.push(label);
        if candidates.len() == MAX_CANDIDATES {
            break;
        }
    }
    candidates
}

fn words_of_city(city: &str) -> String {
    words(city).concat()
}
