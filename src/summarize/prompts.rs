//! Prompt text for the three kinds of summarization call.

/// System instruction for chunk summaries: factual, no commentary, no citations.
pub const CHUNK_SYSTEM: &str = "You are an assistant summarizing parts of a book. \
    Capture the key points, events, and details accurately and factually. \
    Do not provide analysis or commentary.";

pub fn chunk_user(text: &str) -> String {
    format!(
        "Summarize the following text. Give an objective overview of the events, \
         characters, and significant details in the passage. Avoid interpretation, \
         commentary, or thematic analysis.\n\n{text}"
    )
}

pub fn book_system(theme: &str) -> String {
    format!(
        "You are an assistant tasked with summarizing a book. Write a cohesive, \
         thematic summary from the provided text. Emphasize the theme of {theme} \
         in your final summary."
    )
}

pub fn book_user(theme: &str, combined: &str) -> String {
    format!(
        "Read the following text and write a comprehensive summary of the novel. \
         Include vivid, specific events, symbols, and imagery that bring out the \
         theme of {theme}. Avoid redundant details.\n\n{combined}"
    )
}

pub const REPORT_SYSTEM: &str = "You are an assistant tasked with writing a five \
    paragraph comparative literature essay. State a clear thesis, argue from the \
    content of each novel, and close with a paragraph that summarizes the arguments.";

pub fn report_user(theme: &str, combined: &str) -> String {
    format!(
        "Using the following book summaries, write a five paragraph comparative \
         literature essay. Analyze how each book addresses the theme of {theme}, \
         present a clear thesis, draw interesting intertextual comparisons, and \
         conclude with a synthesis of the analysis.\n\n{combined}"
    )
}

/// Chunk summaries joined by blank lines.
pub fn combine_chunk_summaries(summaries: &[String]) -> String {
    summaries.join("\n\n")
}

/// Book summaries, each under a `Book Summary:` label, joined by blank lines.
pub fn combine_book_summaries(summaries: &[String]) -> String {
    summaries
        .iter()
        .map(|s| format!("Book Summary:\n{s}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
