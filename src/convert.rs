//! Decides which of a map's shaders need a generated definition to look right in the target game.

use bsp::{Bsp, BspShader, ContentFlags, SurfaceFlags};
use fs::ShaderFs;
use shader::{BlendMode, ShaderGenerator, SimplifiedParams};


/// Parameters for a simplified stand-in for this shader, or None if the default rendering will do.
pub fn simplified_params_for(shader: &BspShader) -> Option<SimplifiedParams> {
    let surface = shader.surface_flags();
    let contents = shader.content_flags();
    if surface.is_invisible() || surface.contains(SurfaceFlags::SKY) || contents.contains(ContentFlags::FOG) {
        return None;
    }

    let translucent = contents.contains(ContentFlags::TRANSLUCENT);
    let unlit = surface.contains(SurfaceFlags::NOLIGHTMAP);
    if !translucent && !unlit {
        return None;
    }

    let mut params = SimplifiedParams::default();
    if translucent {
        params.blend = BlendMode::Blend;
    }
    if unlit {
        params.lightmapped = false;
    }
    Some(params)
}

/// Declare a simplified shader for every shader in the map that needs one.  Shaders the library
/// already defines are left alone by the generator.  Returns how many declarations were made.
pub fn declare_generated_shaders<F: ShaderFs>(bsp: &Bsp, generator: &mut ShaderGenerator<F>) -> usize {
    let mut declared = 0;
    for shader in &bsp.shaders {
        if let Some(params) = simplified_params_for(shader) {
            debug!("declaring simplified shader {}", shader.name);
            generator.define_simplified(&shader.name, &shader.name, params);
            declared += 1;
        }
    }
    declared
}
