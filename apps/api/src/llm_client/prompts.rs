// Shared prompt fragments used by every module that calls the model.
// Each feature keeps its own prompts.rs next to it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences, HTML or any other formatting. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps the model from inventing facts.
pub const GROUNDING_INSTRUCTION: &str = "\
    Base every statement only on the review text provided. \
    Do NOT infer employers, dates or skills that the reviews do not support. \
    If the reviews do not mention something, leave it out.";
