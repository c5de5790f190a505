use std::str;

use nom::{self, IResult, Needed};


/// Parse a fixed-width, NUL-padded ASCII field, as used for names in binary lumps.  Anything after
/// the first NUL is ignored; a non-printable character before it is an error.
pub fn fixed_length_ascii(input: &[u8], len: usize) -> IResult<&[u8], &str> {
    if input.len() < len {
        return Err(nom::Err::Incomplete(Needed::Size(len)));
    }

    for i in 0..len {
        match input[i] {
            0 => {
                // This is the end
                let s = unsafe { str::from_utf8_unchecked(&input[..i]) };
                return Ok((&input[len..], s));
            }
            32 ..= 126 => {
                // OK
            }
            _ => {
                // Totally bogus character
                return Err(nom::Err::Error(nom::Context::Code(&input[i..], nom::ErrorKind::Custom(0))));
            }
        }
    }

    Ok((&input[len..], unsafe { str::from_utf8_unchecked(&input[..len]) }))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_nul() {
        let (rest, name) = fixed_length_ascii(b"abc\0\xff\xffxyz", 6).unwrap();
        assert_eq!(name, "abc");
        assert_eq!(rest, b"xyz");
    }

    #[test]
    fn full_width_names() {
        let (_, name) = fixed_length_ascii(b"abcdef", 6).unwrap();
        assert_eq!(name, "abcdef");
    }

    #[test]
    fn rejects_junk_and_short_input() {
        assert!(fixed_length_ascii(b"ab\x01def", 6).is_err());
        assert!(fixed_length_ascii(b"ab", 6).is_err());
    }
}
