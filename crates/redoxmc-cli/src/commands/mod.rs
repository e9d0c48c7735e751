pub mod enumerate;
pub mod simulate;
pub mod summarize;
