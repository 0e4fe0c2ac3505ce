use std::io::Cursor;

use lanetag::{Error, Tagger, Trainer};

fn trainer_for(corpus: &str) -> Trainer {
    let mut trainer = Trainer::new();
    trainer.read_corpus(Cursor::new(corpus)).unwrap();
    trainer
}

#[test]
fn alternating_corpus_trains_a_deterministic_tagger() {
    // x is only ever A, y is only ever B, and the sentence alternates, so
    // all counted events except B -> A are certain.
    let corpus = "x\nA\ny\nB\nx\nA\ny\nB\n\n";
    let trained = trainer_for(corpus).estimate().unwrap();
    let a = trained.labels().id("A").unwrap();
    let b = trained.labels().id("B").unwrap();
    let x = trained.tokens().id("x").unwrap();
    assert_eq!(trained.model().start(a), 0.0);
    assert_eq!(trained.model().transition(a, b), 0.0);
    assert_eq!(trained.model().transition(a, a), f64::NEG_INFINITY);
    assert_eq!(trained.model().emission(a, x), 0.0);

    let mut tagger = Tagger::with_workers(trained, 2);
    assert_eq!(tagger.tag(&["x", "y"]), vec!["A", "B"]);
    assert_eq!(
        tagger.tag(&["x", "y", "x", "y", "x", "y"]),
        vec!["A", "B", "A", "B", "A", "B"]
    );
}

#[test]
fn ambiguous_tokens_resolve_by_context() {
    // "watch" appears as both N and V; its label follows what precedes it.
    let corpus = "\
the\nD\nwatch\nN\nstopped\nV\n\n\
the\nD\nwatch\nN\nstopped\nV\n\n\
they\nP\nwatch\nV\n\n\
they\nP\nwatch\nV\n\n";
    let mut tagger = Tagger::train_with_workers(Cursor::new(corpus), 2).unwrap();
    assert_eq!(tagger.tag(&["the", "watch"]), vec!["D", "N"]);
    assert_eq!(tagger.tag(&["they", "watch"]), vec!["P", "V"]);
}

#[test]
fn unknown_tokens_use_the_fallback_and_are_counted() {
    let corpus = "x\nA\ny\nB\nx\nA\ny\nB\n\n";
    let mut tagger = Tagger::train_with_workers(Cursor::new(corpus), 2).unwrap();
    // Unknown tokens are treated as the first-seen token, "x".
    assert_eq!(tagger.tag(&["qqq", "y"]), vec!["A", "B"]);
    assert_eq!(tagger.unknown_tokens(), 1);
    tagger.tag(&["qqq", "zzz"]);
    assert_eq!(tagger.unknown_tokens(), 3);
}

#[test]
fn training_feeds_every_parameter_the_decoder_reads() {
    // Three labels across three sentences with one shared token; decoding
    // a held-out arrangement exercises starts, transitions and emissions
    // estimated from more than one sentence.
    let corpus = "\
a\nX\nb\nY\nc\nZ\n\n\
a\nX\nb\nY\n\n\
b\nY\nc\nZ\n\n";
    let mut tagger = Tagger::train_with_workers(Cursor::new(corpus), 3).unwrap();
    assert_eq!(tagger.tag(&["a", "b", "c"]), vec!["X", "Y", "Z"]);
    assert_eq!(tagger.tag(&["b", "c"]), vec!["Y", "Z"]);
    assert_eq!(tagger.tag(&["a", "b"]), vec!["X", "Y"]);
}

#[test]
fn token_without_label_is_rejected() {
    let mut trainer = Trainer::new();
    let err = trainer
        .read_corpus(Cursor::new("x\nA\norphan\n"))
        .unwrap_err();
    match err {
        Error::MissingLabel { line, token } => {
            assert_eq!(line, 3);
            assert_eq!(token, "orphan");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_sentence_is_rejected() {
    let mut trainer = Trainer::new();
    let err = trainer
        .read_corpus(Cursor::new("x\nA\n\n\ny\nB\n\n"))
        .unwrap_err();
    assert!(matches!(err, Error::EmptySentence { line: 4 }));
}

#[test]
fn unterminated_corpus_is_rejected() {
    let mut trainer = Trainer::new();
    let err = trainer.read_corpus(Cursor::new("x\nA\ny\nB\n")).unwrap_err();
    assert!(matches!(err, Error::UnterminatedSentence));
}

#[test]
fn empty_corpus_cannot_be_estimated() {
    let trainer = Trainer::new();
    assert!(matches!(trainer.estimate(), Err(Error::EmptyCorpus)));
}

#[test]
fn errors_format_with_their_line_numbers() {
    let mut trainer = Trainer::new();
    let err = trainer.read_corpus(Cursor::new("\n")).unwrap_err();
    assert_eq!(err.to_string(), "corpus line 1: empty sentence");
}
