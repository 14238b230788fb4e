/// Byte position relative to start of source.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Idx(pub u32);

/// Holds a view into a program source.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub struct Span {
    start: Idx,
    len: u16,
}

impl Span {
    pub fn new(start: Idx, len: u16) -> Self {
        Span { start, len }
    }

    /// Span covering `text`, which must be a subslice of `src`.
    pub fn of(src: &str, text: &str) -> Self {
        let start = text.as_ptr() as usize - src.as_ptr() as usize;
        Span::new(Idx(start as u32), text.len().min(u16::MAX as usize) as u16)
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        let start = self.start.0 as usize;
        let end = start + self.len as usize;
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subslice_span() {
        let src = "10000010\n00000000 # R0\n";
        let line = src.lines().nth(1).unwrap();
        let text = line.split('#').next().unwrap().trim();
        assert_eq!(Span::of(src, text).as_range(), 9..17);
        assert_eq!(&src[Span::of(src, text).as_range()], "00000000");
    }
}
