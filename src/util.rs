pub mod escape;
pub mod number;
