pub mod constants;
pub mod registers;
