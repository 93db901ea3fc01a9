// Tests for fragment buffering and utterance assembly
//
// These tests verify the grouping rules: fragments from one speaker
// within the silence threshold coalesce into one message, gaps and
// other speakers split messages, and emitted messages are ordered by
// their first fragment's start time.

use voice_scribe::transcript::{assemble_utterances, Fragment, FragmentBuffers};

fn fragment(speaker: &str, text: &str, start_ms: u64) -> Fragment {
    Fragment {
        speaker_id: speaker.to_string(),
        username: speaker.to_string(),
        text: text.to_string(),
        start_ms,
        end_ms: start_ms + 200,
    }
}

/// Stamps arrival order the way the session buffers do
fn batch(fragments: Vec<Fragment>) -> Vec<(u64, Fragment)> {
    fragments
        .into_iter()
        .enumerate()
        .map(|(i, f)| (i as u64, f))
        .collect()
}

#[test]
fn test_fragments_within_threshold_merge() {
    let drained = batch(vec![
        fragment("alice", "hello", 0),
        fragment("alice", "world", 500),
    ]);

    let utterances = assemble_utterances(drained, 1000);

    assert_eq!(utterances.len(), 1, "gap within threshold should merge");
    assert_eq!(utterances[0].text, "hello world");
    assert_eq!(utterances[0].start_ms, 0);
    assert_eq!(utterances[0].end_ms, 700, "merged utterance ends with its last fragment");
}

#[test]
fn test_fragments_beyond_threshold_split() {
    let drained = batch(vec![
        fragment("alice", "hello", 0),
        fragment("alice", "world", 1500),
    ]);

    let utterances = assemble_utterances(drained, 1000);

    assert_eq!(utterances.len(), 2, "gap beyond threshold should split");
    assert_eq!(utterances[0].text, "hello");
    assert_eq!(utterances[1].text, "world");
}

#[test]
fn test_interleaved_speaker_does_not_break_a_run() {
    // Speaker B speaks between two of A's fragments; A's run stays whole
    let drained = batch(vec![
        fragment("alice", "hello", 0),
        fragment("alice", "world", 300),
        fragment("bob", "hi", 100),
    ]);

    let utterances = assemble_utterances(drained, 1000);

    assert_eq!(utterances.len(), 2);
    assert_eq!(utterances[0].username, "alice");
    assert_eq!(utterances[0].text, "hello world");
    assert_eq!(utterances[1].username, "bob");
    assert_eq!(utterances[1].text, "hi");
}

#[test]
fn test_messages_ordered_by_first_fragment_start() {
    let drained = batch(vec![
        fragment("bob", "second", 400),
        fragment("alice", "first", 100),
        fragment("carol", "third", 900),
    ]);

    let utterances = assemble_utterances(drained, 200);

    let order: Vec<&str> = utterances.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(
        order,
        vec!["first", "second", "third"],
        "messages must be chronological by first fragment start"
    );
}

#[test]
fn test_empty_and_whitespace_fragments_dropped() {
    let drained = batch(vec![
        fragment("alice", "hello", 0),
        fragment("alice", "", 100),
        fragment("alice", "   ", 200),
        fragment("alice", "world", 300),
    ]);

    let utterances = assemble_utterances(drained, 1000);

    assert_eq!(utterances.len(), 1);
    assert_eq!(
        utterances[0].text, "hello world",
        "empty fragments must not leave extra separators"
    );
}

#[test]
fn test_all_empty_fragments_yield_no_utterances() {
    let drained = batch(vec![fragment("alice", "", 0), fragment("bob", " ", 100)]);

    assert!(assemble_utterances(drained, 1000).is_empty());
}

#[test]
fn test_start_time_ties_broken_by_arrival_order() {
    let drained = batch(vec![
        fragment("alice", "first arrival", 500),
        fragment("bob", "second arrival", 500),
    ]);

    let utterances = assemble_utterances(drained, 100);

    assert_eq!(utterances[0].text, "first arrival");
    assert_eq!(utterances[1].text, "second arrival");
}

#[test]
fn test_silence_gap_measured_start_to_start() {
    // Starts 1000ms apart with a 1000ms threshold: still one utterance
    let drained = batch(vec![
        fragment("alice", "a", 0),
        fragment("alice", "b", 1000),
    ]);

    let utterances = assemble_utterances(drained, 1000);
    assert_eq!(utterances.len(), 1, "a gap equal to the threshold still merges");
}

#[test]
fn test_fragment_buffers_drain_clears_pending() {
    let mut buffers = FragmentBuffers::new();
    assert!(buffers.is_empty());

    buffers.push(fragment("alice", "one", 0));
    buffers.push(fragment("bob", "two", 100));
    buffers.push(fragment("alice", "three", 200));

    assert!(!buffers.is_empty());
    assert_eq!(buffers.pending_count(), 3);

    let drained = buffers.drain();
    assert_eq!(drained.len(), 3);
    assert!(buffers.is_empty(), "drain must leave the buffers empty");
    assert_eq!(buffers.pending_count(), 0);
}

#[test]
fn test_fragment_buffers_stamp_monotonic_arrivals() {
    let mut buffers = FragmentBuffers::new();
    buffers.push(fragment("alice", "one", 0));
    buffers.push(fragment("bob", "two", 0));

    let mut drained = buffers.drain();
    drained.sort_by_key(|(arrival, _)| *arrival);

    assert_eq!(drained[0].1.text, "one");
    assert_eq!(drained[1].1.text, "two");
}
