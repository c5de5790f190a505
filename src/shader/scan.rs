//! Reads the shader library, noting every shader that's already defined somewhere.  Nothing here
//! is fatal: a broken file only means fewer shaders are known to exist.

use fs::ShaderFs;
use parse::token::{Step, Tokenizer};
use super::{Diagnostic, Handle, ShaderContext, ShaderKind, SourceFile};

pub const SHADER_EXTENSION: &str = ".shader";


/// Register every shader in every `.shader` file in the context's base directory.
pub fn scan_shader_files<F: ShaderFs>(fs: &F, ctx: &mut ShaderContext) {
    let dir = ctx.base_dir().to_path_buf();
    let filenames = match fs.list_files(&dir, SHADER_EXTENSION) {
        Ok(filenames) => filenames,
        Err(err) => {
            debug!("couldn't list {}: {}", dir.display(), err);
            Vec::new()
        }
    };

    if filenames.is_empty() {
        ctx.report(Diagnostic::NoShaderFiles { dir: dir.display().to_string() });
        return;
    }

    for filename in &filenames {
        let file = match ctx.files.get_or_create(filename) {
            Ok(file) => file,
            Err(_) => {
                ctx.report(Diagnostic::RegistryFull { table: "shader file", name: filename.clone() });
                continue;
            }
        };
        ctx.files.get_mut(file).scanned = true;

        let buffer = match fs.read_file(&dir.join(filename)) {
            Ok(buffer) => buffer,
            Err(err) => {
                ctx.report(Diagnostic::UnreadableFile { file: filename.clone(), reason: err.to_string() });
                continue;
            }
        };
        scan_buffer(ctx, file, buffer.bytes());
    }

    debug!("found {} shaders in {} shader files", ctx.shaders.len(), filenames.len());
}

/// Register the shaders defined in one file's contents.  Parsing stops at the first structural
/// problem, but whatever came before it still counts.
pub fn scan_buffer(ctx: &mut ShaderContext, file: Handle<SourceFile>, buf: &[u8]) {
    let filename = ctx.files.get(file).filename.clone();
    let mut tokenizer = Tokenizer::new(buf);

    loop {
        let name = match tokenizer.next_token(true).token() {
            Some(ref token) if token.text.is_empty() => break,
            Some(token) => token,
            None => break,
        };

        match tokenizer.next_token(true) {
            Step::Token(ref token) if token.is("{") => {}
            step => {
                let found = step.token()
                    .filter(|token| !token.text.is_empty())
                    .map(|token| (token.text.into_owned(), token.line));
                ctx.report(Diagnostic::MissingOpeningBrace {
                    file: filename,
                    shader: name.text.into_owned(),
                    line: name.line,
                    found,
                });
                return;
            }
        }

        if !tokenizer.skip_braced_section(1) {
            ctx.report(Diagnostic::MissingClosingBrace {
                file: filename,
                shader: name.text.into_owned(),
                line: name.line,
            });
            return;
        }

        register_authored(ctx, file, &filename, &name.text, name.line);
    }
}

fn register_authored(ctx: &mut ShaderContext, file: Handle<SourceFile>, filename: &str, name: &str, line: usize) {
    let handle = match ctx.shaders.get_or_create(name) {
        Ok(handle) => handle,
        Err(_) => {
            ctx.report(Diagnostic::RegistryFull { table: "shader", name: name.to_string() });
            return;
        }
    };

    let (previous_owner, previous_line) = {
        let shader = ctx.shaders.get(handle);
        (shader.owner, shader.line)
    };
    if let Some(previous_owner) = previous_owner {
        // First definition wins
        let previous_file = ctx.files.get(previous_owner).filename.clone();
        ctx.report(Diagnostic::DuplicateShader {
            shader: name.to_string(),
            line,
            file: filename.to_string(),
            previous_file,
            previous_line,
        });
        return;
    }

    {
        let shader = ctx.shaders.get_mut(handle);
        shader.kind = ShaderKind::Authored;
        shader.owner = Some(file);
        shader.line = Some(line);
    }
    ctx.files.get_mut(file).authored.push(handle);
}
