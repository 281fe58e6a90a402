pub mod backtrack;
pub mod bud;
pub mod walk;
