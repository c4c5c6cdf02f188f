pub mod assign;
pub mod extract;
