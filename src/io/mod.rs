pub mod dian;
pub mod lenex;
pub mod xml;
