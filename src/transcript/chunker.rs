/// Splits a rendered message into chunks that fit the output channel's
/// character limit, breaking only at word boundaries.
///
/// Every chunk, including continuations, carries the `"<speaker>: "`
/// prefix so each delivered piece is attributable on its own. A single
/// word longer than the limit is emitted alone as an oversized chunk
/// rather than truncated; the channel may reject it, which the sink
/// treats like any other delivery failure.
pub fn chunk_message(speaker: &str, text: &str, limit: usize) -> Vec<String> {
    let prefix = format!("{speaker}: ");
    let prefix_chars = prefix.chars().count();

    let mut chunks = Vec::new();
    let mut current = prefix.clone();
    let mut current_chars = prefix_chars;
    let mut has_words = false;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if has_words && current_chars + 1 + word_chars > limit {
            chunks.push(std::mem::replace(&mut current, prefix.clone()));
            current_chars = prefix_chars;
            has_words = false;
        }

        if has_words {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
        has_words = true;
    }

    if has_words {
        chunks.push(current);
    }

    chunks
}
