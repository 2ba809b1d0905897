pub mod hex;
pub mod string;
