// Similar-employee search in three stages:
//   analysis   → the model splits a target employee into hard filters and soft criteria
//   filtering  → hard filters plus the caller's own filters narrow the roster to candidate ids
//   evaluation → the model scores each candidate against the target; the best three are kept

pub mod analysis;
pub mod evaluation;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod prompts;
