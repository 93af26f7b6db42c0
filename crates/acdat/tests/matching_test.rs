// Matching behavior tests: the classic Aho-Corasick scenarios plus the
// edge cases of this implementation (duplicates, empty keyword, Unicode
// offsets, long keywords).

use acdat::{Automaton, AutomatonBuilder};
use std::collections::BTreeMap;

fn build_words(words: &[&str]) -> Automaton<String> {
    let mut builder = AutomatonBuilder::new();
    for &word in words {
        builder.insert(word, word.to_string());
    }
    builder.build().unwrap()
}

fn spans<V>(automaton: &Automaton<V>, text: &str) -> Vec<(usize, usize)> {
    automaton
        .parse_text(text)
        .iter()
        .map(|h| (h.begin, h.end))
        .collect()
}

#[test]
fn baseline_uhers() {
    // {"hers","his","she","he"} over "uhers": only "he" and "hers" occur.
    let automaton = build_words(&["hers", "his", "she", "he"]);
    let hits = automaton.parse_text("uhers");
    let triples: Vec<(usize, usize, &str)> = hits
        .iter()
        .map(|h| (h.begin, h.end, h.value.as_str()))
        .collect();
    assert_eq!(triples, vec![(1, 3, "he"), (1, 5, "hers")]);

    // Every reported span slices back to its keyword.
    let text = "uhers";
    for hit in &hits {
        assert_eq!(&text[hit.begin..hit.end], hit.value.as_str());
    }
}

#[test]
fn matches_scenarios() {
    let mut dictionary = BTreeMap::new();
    dictionary.insert("space", 1);
    dictionary.insert("keyword", 2);
    dictionary.insert("ch", 3);
    let automaton = Automaton::build(dictionary).unwrap();

    assert!(automaton.matches("space"));
    assert!(automaton.matches("keyword"));
    assert!(automaton.matches("ch"));
    assert!(automaton.matches("  ch"));
    assert!(automaton.matches("chkeyword"));
    assert!(automaton.matches("oooospace2"));
    assert!(!automaton.matches("c"));
    assert!(!automaton.matches(""));
    assert!(!automaton.matches("spac"));
    assert!(!automaton.matches("nothing"));
}

#[test]
fn membership_iff_scan_nonempty() {
    let automaton = build_words(&["foo", "bar", "o b"]);
    for text in ["", "f", "foo", "xbarx", "fo obar", "foo bar", "ofo obo"] {
        assert_eq!(
            automaton.matches(text),
            !automaton.parse_text(text).is_empty(),
            "disagreement on {:?}",
            text
        );
    }
}

#[test]
fn find_first_scenarios() {
    let mut builder = AutomatonBuilder::new();
    builder.insert("space", 1);
    builder.insert("keyword", 2);
    builder.insert("ch", 3);
    let automaton = builder.build().unwrap();

    let hit = automaton.find_first("space").unwrap();
    assert_eq!((hit.begin, hit.end, *hit.value), (0, 5, 1));

    let hit = automaton.find_first("a lot of garbage in the space ch").unwrap();
    assert_eq!((hit.begin, hit.end, *hit.value), (24, 29, 1));

    assert!(automaton.find_first("").is_none());
    assert!(automaton.find_first("value").is_none());
    assert!(automaton.find_first("keywork").is_none());
    assert!(automaton.find_first(" no pace").is_none());
}

#[test]
fn find_first_tie_prefers_earliest_inserted() {
    // "she" and "he" both end at position 3 in "she"; the keyword inserted
    // first wins the tie, whichever one that is.
    let mut builder = AutomatonBuilder::new();
    builder.insert("she", "she");
    builder.insert("he", "he");
    let automaton = builder.build().unwrap();
    let hit = automaton.find_first("she").unwrap();
    assert_eq!((hit.begin, hit.end, *hit.value), (0, 3, "she"));

    let mut builder = AutomatonBuilder::new();
    builder.insert("he", "he");
    builder.insert("she", "she");
    let automaton = builder.build().unwrap();
    let hit = automaton.find_first("she").unwrap();
    assert_eq!((hit.begin, hit.end, *hit.value), (1, 3, "he"));
}

#[test]
fn cancellation_stops_the_scan() {
    let automaton = build_words(&["foo", "bar"]);
    let haystack = "sfwtfoowercwbarqwrcq";

    let mut all = 0;
    automaton.parse_text_cancellable(haystack, |_, _, _| {
        all += 1;
        true
    });
    let mut first_only = 0;
    automaton.parse_text_cancellable(haystack, |_, _, _| {
        first_only += 1;
        false
    });

    assert_eq!(all, 2);
    assert_eq!(first_only, 1);
}

#[test]
fn callback_and_list_agree() {
    let automaton = build_words(&["hers", "his", "she", "he"]);
    let text = "ushers and his herds";

    let listed = spans(&automaton, text);
    let mut streamed = Vec::new();
    automaton.parse_text_with(text, |begin, end, _| streamed.push((begin, end)));
    assert_eq!(listed, streamed);

    let mut indexed = Vec::new();
    automaton.parse_text_indexed(text, |begin, end, value, index| {
        indexed.push((begin, end));
        // The index is a stable handle into insertion order.
        assert_eq!(value.as_str(), ["hers", "his", "she", "he"][index]);
    });
    assert_eq!(listed, indexed);
}

#[test]
fn empty_dictionary_matches_nothing() {
    let automaton = Automaton::<String>::build(Vec::<(String, String)>::new()).unwrap();
    assert_eq!(automaton.len(), 0);
    assert!(automaton.is_empty());
    assert_eq!(automaton.transition_table_len(), 0);

    for text in ["", "anything at all", "日本語"] {
        assert!(automaton.parse_text(text).is_empty());
        assert!(!automaton.matches(text));
        assert!(automaton.find_first(text).is_none());
        assert!(automaton.get(text).is_none());
    }
}

#[test]
fn duplicate_keywords_coexist() {
    let mut builder = AutomatonBuilder::new();
    builder.insert("he", 1);
    builder.insert("he", 2);
    let automaton = builder.build().unwrap();

    let hits = automaton.parse_text("he");
    let values: Vec<i32> = hits.iter().map(|h| *h.value).collect();
    // Both indices emit at the same node, reported in descending order.
    assert_eq!(values, vec![2, 1]);
    for hit in &hits {
        assert_eq!((hit.begin, hit.end), (0, 2));
    }
    // Exact match resolves to the latest-inserted value.
    assert_eq!(automaton.get("he"), Some(&2));
}

#[test]
fn empty_keyword_hits_at_every_position() {
    let mut builder = AutomatonBuilder::new();
    builder.insert("", ());
    let automaton = builder.build().unwrap();

    let hits = automaton.parse_text("abc");
    let zero_spans: Vec<(usize, usize)> = hits.iter().map(|h| (h.begin, h.end)).collect();
    assert_eq!(zero_spans, vec![(1, 1), (2, 2), (3, 3)]);
    assert!(automaton.parse_text("").is_empty());
}

#[test]
fn empty_keyword_mixes_with_ordinary_keywords() {
    let mut builder = AutomatonBuilder::new();
    builder.insert("", "empty");
    builder.insert("ab", "ab");
    let automaton = builder.build().unwrap();

    let hits = automaton.parse_text("ab");
    let triples: Vec<(usize, usize, &str)> =
        hits.iter().map(|h| (h.begin, h.end, *h.value)).collect();
    // Position 1: zero-length hit. Position 2: "ab", then the zero-length
    // hit inherited through the failure chain.
    assert_eq!(
        triples,
        vec![(1, 1, "empty"), (0, 2, "ab"), (2, 2, "empty")]
    );
}

#[test]
fn unicode_offsets_are_character_based() {
    let automaton = build_words(&["日本語", "本"]);
    let hits = automaton.parse_text("日本語テスト");
    let triples: Vec<(usize, usize, &str)> = hits
        .iter()
        .map(|h| (h.begin, h.end, h.value.as_str()))
        .collect();
    assert_eq!(triples, vec![(1, 2, "本"), (0, 3, "日本語")]);
    // end - begin equals the character length, not the byte length.
    for (begin, end, value) in triples {
        assert_eq!(end - begin, value.chars().count());
    }
}

/// Deterministic pseudo-random lowercase text (xorshift64).
fn pseudo_text(len: usize) -> String {
    let mut x: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (b'a' + (x % 26) as u8) as char
        })
        .collect()
}

#[test]
fn very_long_keyword() {
    let text = pseudo_text(8_000);
    let long = &text[10..4_000];
    let short = &text[30..40];

    let mut builder = AutomatonBuilder::new();
    builder.insert(long, "long");
    builder.insert(short, "short");
    let automaton = builder.build().unwrap();

    let hits = automaton.parse_text(&text);
    let triples: Vec<(usize, usize, &str)> =
        hits.iter().map(|h| (h.begin, h.end, *h.value)).collect();
    assert_eq!(triples, vec![(30, 40, "short"), (10, 4_000, "long")]);
}

#[test]
fn overlapping_keywords_all_reported() {
    let automaton = build_words(&["ab", "abc", "bc", "c"]);
    let got = spans(&automaton, "abc");
    // ends in order: 2 ("ab"), 3 ("abc", "bc", "c" co-terminate).
    assert_eq!(got.len(), 4);
    assert_eq!(got[0], (0, 2));
    let mut tail = got[1..].to_vec();
    tail.sort_unstable();
    assert_eq!(tail, vec![(0, 3), (1, 3), (2, 3)]);
}
