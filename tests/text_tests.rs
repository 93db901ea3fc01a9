// Tests for message chunking, duplicate detection, and speaker names

use std::collections::HashMap;
use voice_scribe::transcript::{chunk_message, is_similar, similarity, SpeakerNames};

// ============================================================================
// Chunking
// ============================================================================

#[test]
fn test_short_message_is_one_chunk() {
    let chunks = chunk_message("Alice", "hello world", 100);

    assert_eq!(chunks, vec!["Alice: hello world"]);
}

#[test]
fn test_chunks_respect_the_limit() {
    let text = "one two three four five six seven eight nine ten";
    let chunks = chunk_message("Alice", text, 20);

    assert!(chunks.len() > 1, "long message should split");
    for chunk in &chunks {
        assert!(
            chunk.chars().count() <= 20,
            "chunk exceeds limit: {:?}",
            chunk
        );
    }
}

#[test]
fn test_every_chunk_carries_the_speaker_prefix() {
    let text = "one two three four five six seven eight nine ten";
    let chunks = chunk_message("Alice", text, 20);

    for chunk in &chunks {
        assert!(
            chunk.starts_with("Alice: "),
            "continuation chunk lost its prefix: {:?}",
            chunk
        );
    }
}

#[test]
fn test_chunking_round_trip_reconstructs_the_message() {
    let text = "the quick brown fox jumps over the lazy dog again and again";
    let chunks = chunk_message("Bob", text, 25);

    let rebuilt = chunks
        .iter()
        .map(|c| c.strip_prefix("Bob: ").expect("chunk must carry prefix"))
        .collect::<Vec<_>>()
        .join(" ");

    assert_eq!(rebuilt, text);
}

#[test]
fn test_words_are_never_split() {
    let text = "alpha beta gamma delta";
    let chunks = chunk_message("A", text, 12);

    for chunk in &chunks {
        let body = chunk.strip_prefix("A: ").unwrap();
        for word in body.split(' ') {
            assert!(
                ["alpha", "beta", "gamma", "delta"].contains(&word),
                "word was split across chunks: {:?}",
                word
            );
        }
    }
}

#[test]
fn test_oversized_word_is_emitted_alone() {
    let text = "short pneumonoultramicroscopicsilicovolcanoconiosis tail";
    let chunks = chunk_message("A", text, 20);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0], "A: short");
    assert_eq!(
        chunks[1], "A: pneumonoultramicroscopicsilicovolcanoconiosis",
        "an oversized word goes out alone rather than truncated"
    );
    assert_eq!(chunks[2], "A: tail");
}

#[test]
fn test_empty_message_yields_no_chunks() {
    assert!(chunk_message("Alice", "", 100).is_empty());
    assert!(chunk_message("Alice", "   ", 100).is_empty());
}

// ============================================================================
// Similarity
// ============================================================================

#[test]
fn test_identical_strings_are_similar() {
    assert!(is_similar("hello there", "hello there", 0.8));
}

#[test]
fn test_both_empty_strings_are_similar() {
    assert!(is_similar("", "", 0.8));
    assert_eq!(similarity("", ""), 1.0);
}

#[test]
fn test_different_strings_are_not_similar() {
    assert!(!is_similar("hello", "goodbye", 0.8));
}

#[test]
fn test_similarity_is_case_insensitive() {
    assert_eq!(similarity("Hello There", "hello there"), 1.0);
}

#[test]
fn test_near_duplicate_crosses_the_threshold() {
    // One substitution over eleven characters
    assert!(similarity("hello there", "hello thare") > 0.9);
    assert!(is_similar("hello there", "hello thare", 0.8));
}

#[test]
fn test_one_empty_string_is_not_similar() {
    assert_eq!(similarity("hello", ""), 0.0);
    assert!(!is_similar("hello", "", 0.8));
}

// ============================================================================
// Speaker names
// ============================================================================

#[test]
fn test_display_name_lookup_is_lowercased() {
    let names = SpeakerNames::from_map(HashMap::from([(
        "CoolGamer42".to_string(),
        "Dave".to_string(),
    )]));

    assert_eq!(names.display_name("coolgamer42"), "Dave");
    assert_eq!(names.display_name("COOLGAMER42"), "Dave");
}

#[test]
fn test_display_name_falls_back_to_raw_identity() {
    let names = SpeakerNames::from_map(HashMap::new());

    assert_eq!(names.display_name("unmapped_user"), "unmapped_user");
}
