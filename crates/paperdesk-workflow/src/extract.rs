//! Answer text from a session's messages.

use std::time::Duration;

use futures::stream::{self, Stream};

use paperdesk_core::MessageList;

/// First text block of the first message that has one.
pub fn extract_answer(messages: &MessageList) -> Option<String> {
    messages.text_values().next().map(str::to_string)
}

/// Every text block, in order, each followed by a single space.
///
/// Waits `delay` between chunks; a zero delay yields them back to back.
pub fn extract_answer_stream(
    messages: MessageList,
    delay: Duration,
) -> impl Stream<Item = String> + Send + 'static {
    let chunks: Vec<String> = messages
        .text_values()
        .map(|value| format!("{} ", value))
        .collect();

    stream::unfold(
        (chunks.into_iter(), false),
        move |(mut chunks, started)| async move {
            let chunk = chunks.next()?;
            if started && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Some((chunk, (chunks, true)))
        },
    )
}
