pub mod banner;
pub mod interrupt;
pub mod logger;
pub mod utils;
