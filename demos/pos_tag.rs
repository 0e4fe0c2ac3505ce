//! Example: training a tagger from a tiny corpus and tagging sentences.
//!
//! Run with:
//! `cargo run --example pos_tag`

use std::io::Cursor;

use lanetag::Tagger;

fn main() {
    // A miniature corpus: token line, label line, and a blank line after
    // each sentence. Real corpora are files in the same format, fed to the
    // lanetag binary.
    let corpus = "\
the\nD\ndog\nN\nbarks\nV\n\n\
the\nD\ncat\nN\nsleeps\nV\n\n\
a\nD\ndog\nN\nsleeps\nV\n\n";

    let mut tagger = Tagger::train(Cursor::new(corpus)).expect("corpus is well formed");

    let sentences: [&[&str]; 3] = [
        &["the", "dog", "sleeps"],
        &["a", "cat", "barks"],
        // "wombat" is out of vocabulary; it is treated like the first
        // token the corpus introduced and tagged accordingly.
        &["wombat", "dog", "sleeps"],
    ];

    for sentence in sentences {
        let labels = tagger.tag(sentence);
        for (token, label) in sentence.iter().zip(&labels) {
            println!("{token:>8}  {label}");
        }
        println!();
    }

    println!(
        "unknown tokens tagged via the fallback: {}",
        tagger.unknown_tokens()
    );
}
