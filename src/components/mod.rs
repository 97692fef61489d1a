pub mod app_header;
pub mod equation_form;
mod field_message;
pub mod hypothesis_form;
pub mod knowledge_graph;
pub mod results_display;
pub mod suggested_experiments;
pub mod typewriter;
