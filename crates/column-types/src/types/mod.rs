pub mod decimal;
pub mod join;
pub mod lookup;
pub mod text;
