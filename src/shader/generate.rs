use std::io::Write;
use std::path::Path;

use errors::{ErrorKind, Result};
use fs::ShaderFs;
use super::{Diagnostic, Fog, Handle, MAX_SKYBOX_LAYERS, RegistryLimits, Shader, ShaderContext,
    ShaderKind, SimplifiedParams, SimplifiedShader, SkyBox, SkyShader, SourceFile};
use super::emit::write_stanza;
use super::scan::scan_shader_files;


/// Entry point for everything shader related during a conversion.  Scans the library once on
/// `init`, accepts declarations of generated shaders while the map is converted, then appends the
/// new ones to the map's companion file on `flush`.
///
/// Until `init` has run successfully, every other method quietly does nothing.
pub struct ShaderGenerator<F: ShaderFs> {
    fs: F,
    limits: RegistryLimits,
    context: Option<ShaderContext>,
}

impl<F: ShaderFs> ShaderGenerator<F> {
    pub fn new(fs: F) -> Self {
        ShaderGenerator::with_limits(fs, RegistryLimits::default())
    }

    pub fn with_limits(fs: F, limits: RegistryLimits) -> Self {
        ShaderGenerator {
            fs,
            limits,
            context: None,
        }
    }

    /// Scan the shader library in `shader_dir` and get ready to generate shaders for `map_name`.
    /// Does nothing if already initialized, or if `shader_dir` is empty.
    pub fn init<P: AsRef<Path>>(&mut self, shader_dir: P, map_name: &str) {
        let shader_dir = shader_dir.as_ref();
        if self.context.is_some() || shader_dir.as_os_str().is_empty() {
            return;
        }

        let mut context = ShaderContext::new(shader_dir, map_name, &self.limits);
        scan_shader_files(&self.fs, &mut context);
        context.register_companion();
        self.context = Some(context);
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&ShaderContext> {
        self.context.as_ref()
    }

    #[cfg(test)]
    fn fs(&self) -> &F {
        &self.fs
    }

    /// Declare a fog volume shader.  Re-declaring replaces the earlier parameters.
    pub fn define_fog(&mut self, name: &str, color: [f32; 3], distance: f32) {
        let (context, handle) = match self.claim(name) {
            Some(claimed) => claimed,
            None => return,
        };
        context.shaders.get_mut(handle).kind = ShaderKind::Fog(Fog { color, distance });
        context.queue(handle);
    }

    /// Declare the map's sky shader, named `textures/<map name>/sky`.  Re-declaring replaces the
    /// earlier parameters; an empty `editor_image` keeps whichever one was set before.
    pub fn define_sky_box(&mut self, sky_box: &SkyBox, fog_color: [f32; 3], fog_distance: f32, editor_image: &str) {
        let name = match self.context {
            Some(ref context) => format!("textures/{}/sky", context.map_name()),
            None => return,
        };
        let (context, handle) = match self.claim(&name) {
            Some(claimed) => claimed,
            None => return,
        };

        let mut sky_box = sky_box.clone();
        if sky_box.layers.len() > MAX_SKYBOX_LAYERS {
            warn!("sky {} has {} layers, keeping the first {}", name, sky_box.layers.len(), MAX_SKYBOX_LAYERS);
            sky_box.layers.truncate(MAX_SKYBOX_LAYERS);
        }

        let shader = context.shaders.get_mut(handle);
        let editor_image = match shader.kind {
            _ if !editor_image.is_empty() => editor_image.to_string(),
            ShaderKind::Sky(ref previous) => previous.editor_image.clone(),
            _ => String::new(),
        };
        shader.kind = ShaderKind::Sky(SkyShader {
            sky_box,
            fog: Fog { color: fog_color, distance: fog_distance },
            editor_image,
        });
        context.queue(handle);
    }

    /// Declare a plain single-texture shader.  Only the first declaration for a name counts.
    pub fn define_simplified(&mut self, name: &str, diffuse_image: &str, params: SimplifiedParams) {
        let (context, handle) = match self.claim(name) {
            Some(claimed) => claimed,
            None => return,
        };

        let shader = context.shaders.get_mut(handle);
        if shader.kind != ShaderKind::Untouched {
            return;
        }
        shader.kind = ShaderKind::Simplified(SimplifiedShader {
            diffuse_map: diffuse_image.to_string(),
            params,
        });
        context.queue(handle);
    }

    /// Find the shader a declaration is about, unless it's off limits: not initialized, nowhere to
    /// put generated shaders, no room for the name, or the library already defines it.
    fn claim(&mut self, name: &str) -> Option<(&mut ShaderContext, Handle<Shader>)> {
        let context = self.context.as_mut()?;
        context.companion()?;

        let handle = match context.shaders.get_or_create(name) {
            Ok(handle) => handle,
            Err(err) => {
                if let ErrorKind::RegistryFull(table, _) = *err.kind() {
                    context.report(Diagnostic::RegistryFull { table, name: name.to_string() });
                }
                else {
                    debug!("not defining shader {:?}: {}", name, err);
                }
                return None;
            }
        };

        if context.shaders.get(handle).kind == ShaderKind::Authored {
            debug!("shader {} is already defined in {}", name, owner_name(context, handle));
            return None;
        }
        Some((context, handle))
    }

    /// Append every pending generated shader to the companion file.  Returns how many were
    /// written.  If the file can't be opened, nothing is written and the shaders stay pending.
    pub fn flush(&mut self) -> Result<usize> {
        let context = match self.context {
            Some(ref mut context) => context,
            None => return Ok(0),
        };
        let companion = match context.companion() {
            Some(companion) => companion,
            None => return Ok(0),
        };
        let pending: Vec<_> = context.files.get(companion).pending.iter().cloned().collect();
        if pending.is_empty() {
            return Ok(0);
        }

        let path = context.companion_path();
        let mut writer = match self.fs.open_append(&path) {
            Ok(writer) => writer,
            Err(err) => {
                error!("couldn't open {} for writing: {}", path.display(), err);
                return Err(err);
            }
        };

        for &handle in &pending {
            let shader = context.shaders.get(handle);
            info!("Writing shader {}", shader.name);
            write_stanza(&mut *writer, shader)?;
        }
        writer.flush()?;

        context.files.get_mut(companion).pending.clear();
        Ok(pending.len())
    }
}

fn owner_name(context: &ShaderContext, handle: Handle<Shader>) -> &str {
    match context.shaders.get(handle).owner {
        Some(owner) => &context.files.get(owner).filename,
        None => "?",
    }
}

impl ShaderContext {
    /// Hand a freshly declared shader to the companion file.  A shader that's already waiting
    /// keeps its place in line.
    fn queue(&mut self, handle: Handle<Shader>) {
        let companion: Handle<SourceFile> = match self.companion() {
            Some(companion) => companion,
            None => return,
        };
        self.shaders.get_mut(handle).owner = Some(companion);
        let file = self.files.get_mut(companion);
        if !file.pending.contains(&handle) {
            file.pending.push_front(handle);
        }
    }
}
