pub mod cpp_ast;
pub mod move_macro;
pub mod move_pass;
pub mod rewrite;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
