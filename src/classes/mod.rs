//! Native extension classes exposed to script code.

pub mod checksum;
pub mod crc;
