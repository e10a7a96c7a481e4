//! Prompt templates for the two summarization backends

/// System message sent ahead of the user prompt on the chat-completions backend.
pub const CLOUD_SYSTEM_PROMPT: &str = "You are an expert summarizer AI.";

const LOCAL_PROMPT_HEAD: &str = "
You are a highly intelligent and context-aware AI assistant with expertise in natural language understanding, critical thinking, and professional summarization. You are tasked with reading and analyzing a user-submitted document and generating a high-quality summary that captures the essence of the text with clarity, brevity, and precision.

Your summary must:

- Start with a 1–2 sentence overview of the document’s purpose or subject matter.
- Identify and explain the main ideas, arguments, or findings presented.
- Mention key facts, statistics, definitions, and examples when relevant.
- Maintain the tone and intent of the original author.
- Remove redundant content, filler phrases, and unnecessary elaborations.
- Be coherent and useful for someone who hasn't read the original document.

You are also expected to:

- Use bullet points to break down long or dense content.
- Use paragraph format for storytelling or descriptive content.
- Simplify complex terms or jargon when the audience might be general.
- Preserve objectivity and avoid adding your own interpretation or opinions.
- Ensure that each section of the document (if applicable) is proportionately reflected in the summary.

Your response must feel like it was written by a highly experienced analyst with attention to detail and a strong grasp of context.

Now, carefully read and summarize the following text:

";

const LOCAL_PROMPT_TAIL: &str = "

Summary:
";

const CLOUD_PROMPT_HEAD: &str = "
Summarize the following text in a single, well-constructed sentence, capturing the main ideas, key arguments, and significant details. Ensure the summary is clear, concise, and written in a neutral tone, preserving the original intent of the text without adding personal opinions, while avoiding redundant or minor details. Start the summary directly without any introductory phrases like 'Summary:'. Text to summarize:
";

/// Structured analytical summary prompt used with the local generate endpoint.
/// The text is embedded verbatim.
pub fn build_local_prompt(text: &str) -> String {
    let mut prompt =
        String::with_capacity(LOCAL_PROMPT_HEAD.len() + text.len() + LOCAL_PROMPT_TAIL.len());
    prompt.push_str(LOCAL_PROMPT_HEAD);
    prompt.push_str(text);
    prompt.push_str(LOCAL_PROMPT_TAIL);
    prompt
}

/// One-sentence neutral summary prompt used as the user message on the cloud backend.
pub fn build_cloud_prompt(text: &str) -> String {
    format!("{CLOUD_PROMPT_HEAD}{text}\n")
}
