// Prompts for grading interview answers through the LLM client.

/// System prompt for answer grading. Combined with the JSON-only fragment.
pub const SCORE_SYSTEM: &str = "You are a senior full-stack engineer grading a candidate's \
    spoken interview answers. Grade strictly on technical accuracy, depth and clarity.";

/// Replace `{question}`, `{difficulty}`, `{category}` and `{answer}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"Grade the following interview answer.

Question ({difficulty}, {category}):
{question}

Candidate answer:
{answer}

Return a JSON object with this EXACT schema:
{"score": <integer from 0 to 100>}

An empty or off-topic answer scores 0. A complete, accurate answer with
relevant trade-offs scores 90 or above."#;
