#[macro_use]
extern crate bitflags;
extern crate byteorder;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate memmap;
#[macro_use]
extern crate nom;

pub mod bsp;
pub mod convert;
pub mod errors;
pub mod fs;
pub mod input_buffer;
pub mod parse;
pub mod shader;

pub use bsp::{Bsp, BspFormat, BspShader, BSP_FORMATS, detect_format, format_by_name};
pub use convert::declare_generated_shaders;
pub use fs::{DiskFs, ShaderFs};
pub use parse::bsp::parse_bsp;
pub use shader::{Diagnostic, ShaderGenerator};
