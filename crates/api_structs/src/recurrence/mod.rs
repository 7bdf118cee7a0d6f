pub mod codec;
pub mod dtos;
pub mod legacy;
