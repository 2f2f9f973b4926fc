pub mod countries;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod response;
pub mod value_objects;
