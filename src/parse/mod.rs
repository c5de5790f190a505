pub mod bsp;
pub mod token;

mod util;
