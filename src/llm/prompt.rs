//! Prompt construction for cited answer synthesis.
//!
//! Crawled pages become numbered source blocks; the model is instructed
//! to answer from those sources only and cite them as `[n]`.

use blaster_search::PageContent;

use super::client::ChatMessage;

/// System instruction for the answer model.
const SYSTEM_PROMPT: &str = "You are a research assistant. Answer the user's question using only \
the numbered sources provided. Cite sources inline as [1], [2] and so on after each claim. If \
the sources do not contain the answer, say so plainly. Keep the answer under 250 words.";

/// Build the conversation for answering `query` from `pages`.
///
/// Each page's text is clipped to `max_chars_per_source` characters so a
/// handful of pages stays inside the request budget.
pub fn build_messages(
    query: &str,
    pages: &[PageContent],
    max_chars_per_source: usize,
) -> Vec<ChatMessage> {
    let mut sources = String::new();
    for (i, page) in pages.iter().enumerate() {
        let n = i + 1;
        let title = if page.title.is_empty() {
            page.url.as_str()
        } else {
            page.title.as_str()
        };
        let text = clip_chars(&page.text, max_chars_per_source);
        sources.push_str(&format!("[{n}] {title} ({})\n{text}\n\n", page.url));
    }

    let user = format!("Question: {query}\n\nSources:\n\n{sources}");

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}

/// Clip to a char boundary at or below `max_chars` bytes.
fn clip_chars(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        return text;
    }
    let mut end = max_chars;
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &text[..end]
}
