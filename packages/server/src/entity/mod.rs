pub mod vin;
pub mod vin_attribute;
pub mod vin_image;
