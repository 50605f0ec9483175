pub mod normalize_options;
pub mod parse_to_ecma_ast;
