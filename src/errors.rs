use std::io;

use nom;

error_chain! {
    foreign_links {
        Io(io::Error);
    }

    errors {
        ParseError(whence: &'static str) {
            description("nonspecific parse error")
            display("couldn't parse {}", whence)
        }
        TruncatedData(whence: &'static str) {
            description("unexpected end of input")
            display("unexpected end of input while parsing {}", whence)
        }
        InvalidMagic {
            description("invalid magic")
            display("invalid magic")
        }
        UnsupportedVersion(ident: String, version: i32) {
            description("unsupported BSP version")
            display("unsupported BSP version: {} {}", ident, version)
        }
        LumpOutOfBounds(lump: &'static str, offset: i32, length: i32) {
            description("lump outside the bounds of the file")
            display("lump {} at offset {} with length {} is outside the bounds of the file", lump, offset, length)
        }
        RegistryFull(table: &'static str, capacity: usize) {
            description("registry is full")
            display("{} registry is full ({} entries)", table, capacity)
        }
        EmptyName {
            description("empty name")
            display("empty name")
        }
        UnknownFormat(name: String) {
            description("unknown BSP format")
            display("unknown BSP format '{}'", name)
        }
        SameInputAndOutput {
            description("same input and output file")
            display("same input and output file (refusing to overwrite the original)")
        }
        StdioUnsupported {
            description("reading from stdin / writing to stdout is not supported")
            display("reading from stdin / writing to stdout is not supported")
        }
    }
}

/// Convert a nom parse result into one of ours, labelling failures with what was being parsed.
pub fn nom_to_result<I, O>(whence: &'static str, _input: I, result: nom::IResult<I, O>) -> Result<O> {
    match result {
        Ok((_leftovers, output)) => Ok(output),
        Err(nom::Err::Incomplete(_)) => Err(ErrorKind::TruncatedData(whence).into()),
        Err(_) => Err(ErrorKind::ParseError(whence).into()),
    }
}
