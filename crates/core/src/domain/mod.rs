pub mod lead;
pub mod quote;
