// Persona synthesis: half-year + monthly review → schema-constrained model call → Persona.
// All model calls go through llm_client::ChatModel.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod reviews;
