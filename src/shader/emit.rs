//! Shader script text for generated shaders.

use std::io::{self, Write};

use super::{BlendMode, CullMode, Fog, Shader, ShaderKind, SimplifiedShader, SkyShader};


/// Write one complete `name { ... }` stanza.  Shaders that weren't generated produce nothing.
pub fn write_stanza(writer: &mut Write, shader: &Shader) -> io::Result<()> {
    if !shader.kind.is_generated() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "{}", shader.name)?;
    writeln!(writer, "{{")?;
    match shader.kind {
        ShaderKind::Fog(ref fog) => write_fog(writer, fog)?,
        ShaderKind::Sky(ref sky) => write_sky(writer, sky)?,
        ShaderKind::Simplified(ref simplified) => write_simplified(writer, simplified)?,
        ShaderKind::Untouched | ShaderKind::Authored => {}
    }
    writeln!(writer, "}}")
}

fn write_fog(writer: &mut Write, fog: &Fog) -> io::Result<()> {
    writeln!(writer, "\tsurfaceparm trans")?;
    writeln!(writer, "\tsurfaceparm nonsolid")?;
    writeln!(writer, "\tsurfaceparm fog")?;
    writeln!(writer, "\tsurfaceparm nolightmap")?;
    writeln!(writer, "\tfogparms ( {:.6} {:.6} {:.6} ) {:.6}",
        fog.color[0], fog.color[1], fog.color[2], fog.distance)
}

fn write_sky(writer: &mut Write, sky: &SkyShader) -> io::Result<()> {
    writeln!(writer, "\tqer_editorimage {}", sky.editor_image)?;
    writeln!(writer, "\tsurfaceparm noimpact")?;
    writeln!(writer, "\tsurfaceparm nolightmap")?;
    writeln!(writer, "\tsurfaceparm sky")?;
    writeln!(writer, "\tskyparms - {:.6} {}", sky.sky_box.height, sky.sky_box.sky)?;

    if sky.fog.distance > 0.0 {
        writeln!(writer, "\tfogvars ( {:.6} {:.6} {:.6} ) {:.6}",
            sky.fog.color[0], sky.fog.color[1], sky.fog.color[2], sky.fog.distance)?;
    }

    for layer in &sky.sky_box.layers {
        writeln!(writer, "\t{{")?;
        writeln!(writer, "\t\tmap {}", layer.map)?;
        if layer.alpha_gen_const != 1.0 {
            writeln!(writer, "\t\talphaGen const {:.6}", layer.alpha_gen_const)?;
            writeln!(writer, "\t\tblendFunc GL_SRC_ALPHA GL_ONE_MINUS_SRC_ALPHA")?;
        }
        writeln!(writer, "\t\ttcMod scale {:.6} {:.6}", layer.tc_scale[0], layer.tc_scale[1])?;
        writeln!(writer, "\t\ttcMod scroll {:.6} {:.6}", layer.tc_scroll[0], layer.tc_scroll[1])?;
        writeln!(writer, "\t}}")?;
    }
    Ok(())
}

fn write_simplified(writer: &mut Write, shader: &SimplifiedShader) -> io::Result<()> {
    let params = &shader.params;
    match params.cull {
        CullMode::Back => writeln!(writer, "\tcull back")?,
        CullMode::Front => writeln!(writer, "\tcull front")?,
        CullMode::None => writeln!(writer, "\tcull none")?,
    }
    match params.blend {
        BlendMode::None => {}
        BlendMode::AlphaTest => writeln!(writer, "\tsort seethrough")?,
        BlendMode::Blend => writeln!(writer, "\tsort additive")?,
    }

    writeln!(writer, "\t{{")?;
    writeln!(writer, "\t\tmap {}", shader.diffuse_map)?;
    match params.blend {
        BlendMode::None => {}
        BlendMode::AlphaTest => {
            writeln!(writer, "\t\talphaFunc GE128")?;
            writeln!(writer, "\t\tdepthWrite")?;
            writeln!(writer, "\t\tdepthFunc lequal")?;
        }
        BlendMode::Blend => writeln!(writer, "\t\tblendFunc blend")?,
    }
    if params.alpha_gen_const != 1.0 {
        writeln!(writer, "\t\talphaGen const {:.6}", params.alpha_gen_const)?;
    }
    if params.tc_scroll[0] != 0.0 || params.tc_scroll[1] != 0.0 {
        writeln!(writer, "\t\ttcMod scroll {:.6} {:.6}", params.tc_scroll[0], params.tc_scroll[1])?;
    }
    writeln!(writer, "\t}}")?;

    if params.lightmapped {
        writeln!(writer, "\t{{")?;
        writeln!(writer, "\t\tmap $lightmap")?;
        writeln!(writer, "\t\tblendFunc filter")?;
        writeln!(writer, "\t\tdepthFunc equal")?;
        writeln!(writer, "\t\ttcGen lightmap")?;
        writeln!(writer, "\t}}")?;
    }
    Ok(())
}
