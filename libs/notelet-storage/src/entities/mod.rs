pub mod blocks;
pub mod pages;
pub mod prelude;
