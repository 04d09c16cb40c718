// Cross-cutting prompt fragments. Services keep their own prompts.rs next to
// the code that sends them.

/// Appended to every system prompt that expects a JSON reply.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
