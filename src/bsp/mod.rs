//! Quake 3 family BSP files: the formats we know about, and just enough structure to carry a map
//! from one of them to another.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use errors::Result;

pub mod flags;

pub use self::flags::{ContentFlags, SurfaceFlags};

pub const NUM_LUMPS: usize = 17;
pub const HEADER_SIZE: usize = 8 + NUM_LUMPS * 8;

pub const LUMP_ENTITIES: usize = 0;
pub const LUMP_SHADERS: usize = 1;
pub const LUMP_FOGS: usize = 12;

pub const LUMP_NAMES: [&str; NUM_LUMPS] = [
    "entities",
    "shaders",
    "planes",
    "nodes",
    "leafs",
    "leafsurfaces",
    "leafbrushes",
    "models",
    "brushes",
    "brushsides",
    "drawverts",
    "drawindexes",
    "fogs",
    "surfaces",
    "lightmaps",
    "lightgrid",
    "visibility",
];

pub const SHADER_NAME_LENGTH: usize = 64;
pub const SHADER_RECORD_SIZE: usize = SHADER_NAME_LENGTH + 8;


/// A BSP flavor we can read and write.
#[derive(Debug)]
pub struct BspFormat {
    /// What to call it on the command line
    pub name: &'static str,
    pub game_name: &'static str,
    pub ident: &'static [u8; 4],
    pub version: i32,
    /// Where the game keeps its shader scripts, relative to the game directory
    pub shader_dir: &'static str,
}

pub static BSP_FORMATS: [BspFormat; 3] = [
    BspFormat {
        name: "quake3",
        game_name: "Quake 3",
        ident: b"IBSP",
        version: 46,
        shader_dir: "scripts",
    },
    BspFormat {
        name: "rtcw",
        game_name: "Return to Castle Wolfenstein",
        ident: b"IBSP",
        version: 47,
        shader_dir: "scripts",
    },
    // Same file format as RTCW; only the game's interpretation differs
    BspFormat {
        name: "et",
        game_name: "Wolfenstein: Enemy Territory",
        ident: b"IBSP",
        version: 47,
        shader_dir: "scripts",
    },
];

pub fn format_by_name(name: &str) -> Option<&'static BspFormat> {
    BSP_FORMATS.iter().find(|format| format.name.eq_ignore_ascii_case(name))
}

/// First known format with this ident and version.
pub fn detect_format(ident: &[u8], version: i32) -> Option<&'static BspFormat> {
    BSP_FORMATS.iter().find(|format| &format.ident[..] == ident && format.version == version)
}


/// One entry in the shaders lump.  The flags are kept exactly as read, including any bits this
/// crate doesn't know about.
#[derive(Clone, Debug, PartialEq)]
pub struct BspShader {
    pub name: String,
    pub surface_flags: i32,
    pub content_flags: i32,
}

impl BspShader {
    pub fn surface_flags(&self) -> SurfaceFlags {
        SurfaceFlags::from_bits_truncate(self.surface_flags as u32)
    }

    pub fn content_flags(&self) -> ContentFlags {
        ContentFlags::from_bits_truncate(self.content_flags as u32)
    }

    pub fn write_to(&self, writer: &mut Write) -> Result<()> {
        let name = self.name.as_bytes();
        let len = name.len().min(SHADER_NAME_LENGTH);
        writer.write_all(&name[..len])?;
        for _ in len .. SHADER_NAME_LENGTH {
            writer.write_all(&[0])?;
        }
        writer.write_i32::<LittleEndian>(self.surface_flags)?;
        writer.write_i32::<LittleEndian>(self.content_flags)?;
        Ok(())
    }
}


/// A loaded BSP.  Lumps borrow from the input buffer.
pub struct Bsp<'a> {
    pub format: &'static BspFormat,
    pub shaders: Vec<BspShader>,
    /// Every lump, indexed by lump number; the shaders lump is rebuilt from `shaders` on write
    pub lumps: Vec<&'a [u8]>,
}

fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

impl<'a> Bsp<'a> {
    /// Write this map out as `format`.  Lumps are laid out in order, each aligned to four bytes.
    pub fn write_to(&self, format: &BspFormat, writer: &mut Write) -> Result<()> {
        let mut shader_lump = Vec::with_capacity(self.shaders.len() * SHADER_RECORD_SIZE);
        for shader in &self.shaders {
            shader.write_to(&mut shader_lump)?;
        }
        let lumps: Vec<&[u8]> = self.lumps.iter().enumerate()
            .map(|(i, &lump)| if i == LUMP_SHADERS { &shader_lump[..] } else { lump })
            .collect();

        writer.write_all(format.ident)?;
        writer.write_i32::<LittleEndian>(format.version)?;
        let mut offset = HEADER_SIZE;
        for lump in &lumps {
            writer.write_i32::<LittleEndian>(offset as i32)?;
            writer.write_i32::<LittleEndian>(lump.len() as i32)?;
            offset += lump.len() + padding(lump.len());
        }
        for lump in &lumps {
            writer.write_all(lump)?;
            for _ in 0 .. padding(lump.len()) {
                writer.write_all(&[0])?;
            }
        }
        Ok(())
    }
}
