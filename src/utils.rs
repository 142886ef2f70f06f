pub mod integrate;
pub mod is_close;
pub mod quadrature;
