use nom::{IResult, le_i32};

use super::util::fixed_length_ascii;
use bsp::{Bsp, BspShader, NUM_LUMPS, LUMP_NAMES, LUMP_SHADERS, SHADER_NAME_LENGTH, SHADER_RECORD_SIZE, detect_format};
use errors::{ErrorKind, Result, nom_to_result};


pub struct BareLump {
    pub offset: i32,
    pub length: i32,
}

pub struct BareBspHeader<'a> {
    pub ident: &'a [u8],
    pub version: i32,
    pub lumps: Vec<BareLump>,
}

named!(lump_entry<BareLump>, do_parse!(
    offset: le_i32 >>
    length: le_i32 >>
    (BareLump{ offset, length })
));

named!(bsp_header<BareBspHeader>, do_parse!(
    ident: take!(4) >>
    version: le_i32 >>
    lumps: count!(lump_entry, NUM_LUMPS) >>
    (BareBspHeader{ ident, version, lumps })
));

named!(bsp_shader<BspShader>, do_parse!(
    name: apply!(fixed_length_ascii, SHADER_NAME_LENGTH) >>
    surface_flags: le_i32 >>
    content_flags: le_i32 >>
    (BspShader{
        name: name.to_string(),
        surface_flags,
        content_flags,
    })
));

fn shaders_lump(input: &[u8], numshaders: usize) -> IResult<&[u8], Vec<BspShader>> {
    count!(input, bsp_shader, numshaders)
}

pub fn parse_shaders_lump(buf: &[u8]) -> Result<Vec<BspShader>> {
    if buf.len() % SHADER_RECORD_SIZE != 0 {
        bail!(ErrorKind::TruncatedData("shaders lump"));
    }
    if buf.is_empty() {
        return Ok(Vec::new());
    }
    nom_to_result("shaders lump", buf, shaders_lump(buf, buf.len() / SHADER_RECORD_SIZE))
}

/// Parse a Quake 3 family BSP.  Every lump but the shaders is kept as raw bytes.
pub fn parse_bsp(buf: &[u8]) -> Result<Bsp> {
    let header = nom_to_result("BSP header", buf, bsp_header(buf))?;
    let format = match detect_format(header.ident, header.version) {
        Some(format) => format,
        None if header.ident == b"IBSP" => {
            bail!(ErrorKind::UnsupportedVersion(String::from_utf8_lossy(header.ident).into_owned(), header.version));
        }
        None => bail!(ErrorKind::InvalidMagic),
    };

    let mut lumps = Vec::with_capacity(NUM_LUMPS);
    for (i, lump) in header.lumps.iter().enumerate() {
        if lump.offset < 0 || lump.length < 0 || (lump.offset as usize) + (lump.length as usize) > buf.len() {
            bail!(ErrorKind::LumpOutOfBounds(LUMP_NAMES[i], lump.offset, lump.length));
        }
        let start = lump.offset as usize;
        lumps.push(&buf[start..start + lump.length as usize]);
    }

    let shaders = parse_shaders_lump(lumps[LUMP_SHADERS])?;
    Ok(Bsp {
        format,
        shaders,
        lumps,
    })
}
