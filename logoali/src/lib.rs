pub mod domain;
pub mod normalize;
pub mod persistence;
pub mod ports;
pub mod services;
