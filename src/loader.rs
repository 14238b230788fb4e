use miette::Result;

use crate::error;
use crate::span::Span;
use crate::state::MEMORY_SIZE;

/// Parse a text program image into bytes.
///
/// Each line holds one byte as a binary literal. Text after `#` is a comment,
/// and lines left empty once comments are stripped are skipped.
pub fn parse_image(src: &str) -> Result<Vec<u8>> {
    let mut image = Vec::new();
    let mut last_span = Span::default();

    for line in src.lines() {
        let text = match line.split_once('#') {
            Some((code, _comment)) => code,
            None => line,
        }
        .trim();
        if text.is_empty() {
            continue;
        }

        let span = Span::of(src, text);
        // `from_str_radix` accepts a leading sign
        if text.starts_with(['+', '-']) {
            return Err(error::load_bad_lit(span, src));
        }
        let byte = u8::from_str_radix(text, 2).map_err(|_| error::load_bad_lit(span, src))?;
        image.push(byte);
        last_span = span;
    }

    if image.len() > MEMORY_SIZE {
        return Err(error::load_too_long(last_span, src, image.len()));
    }
    tracing::debug!(bytes = image.len(), "parsed program image");
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINT8: &str = "\
# print8.ls8
10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
";

    #[test]
    fn parses_listing() {
        let image = parse_image(PRINT8).unwrap();
        assert_eq!(
            image,
            [0b10000010, 0, 8, 0b01000111, 0, 0b00000001]
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let src = "\n   \n# only a comment\n\t00000001\t# HLT\r\n\n";
        assert_eq!(parse_image(src).unwrap(), [1]);
        assert!(parse_image("").unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_literals() {
        for src in ["10000012", "LDI", "111111111", "-0000001", "+0000001", "1000 0010"] {
            let err = parse_image(src).unwrap_err();
            let code = err.code().map(|c| c.to_string());
            assert_eq!(code.as_deref(), Some("load::bad_lit"), "for {src:?}");
        }
    }

    #[test]
    fn rejects_oversized_image() {
        let src = "00000000\n".repeat(MEMORY_SIZE);
        assert_eq!(parse_image(&src).unwrap().len(), MEMORY_SIZE);

        let src = "00000000\n".repeat(MEMORY_SIZE + 1);
        let err = parse_image(&src).unwrap_err();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("load::too_long"));
    }
}
