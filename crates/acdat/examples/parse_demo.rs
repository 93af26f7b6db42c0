//! Build a small dictionary and print every match in a text.
//!
//! Run with: `cargo run --example parse_demo`

use acdat::Automaton;
use std::collections::BTreeMap;

fn main() -> acdat::Result<()> {
    let mut dictionary = BTreeMap::new();
    for word in ["hers", "his", "she", "he"] {
        dictionary.insert(word, word.to_string());
    }
    let automaton = Automaton::build(dictionary)?;

    let text = "uhers";
    println!("scanning {:?} with {} keywords", text, automaton.len());

    automaton.parse_text_with(text, |begin, end, value| {
        println!("[{}:{}] = {}", begin, end, value);
    });

    match automaton.find_first(text) {
        Some(hit) => println!("first hit: {}", hit),
        None => println!("no hits"),
    }
    Ok(())
}
