// Rewrite engine: tone table, prompt construction, reply parsing and the
// request flow that ties them to the text generator and history store.
// All generation calls go through llm_client::TextGenerator.

pub mod handlers;
pub mod prompts;
pub mod reply_parser;
pub mod service;
pub mod tone;
