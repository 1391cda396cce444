pub mod nutrients;
pub mod product;
