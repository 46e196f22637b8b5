pub mod image;
pub mod vin;
