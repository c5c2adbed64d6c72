use std::fmt::Write as _;

pub use anyhow::{
    self,
    Result,
    Context,
    bail,
    ensure,
};
pub use log::{
    self,
    warn,
    info,
    debug,
    error,
};
pub use ndarray;
pub use regex::Regex;

pub mod trajectory;
pub use trajectory::{
    Atom,
    Frame,
    Trajectory,
};


/// Sorted indices folded into inclusive `start..end` tokens.
///
/// `[0, 1, 2, 5, 7, 8]` becomes `"0..2 5 7..8"`.
pub fn range_format(indices: &[usize]) -> String {
    let mut ret = String::new();
    let mut iter = indices.iter().copied().peekable();

    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }

        if !ret.is_empty() {
            ret.push(' ');
        }
        if start == end {
            let _ = write!(ret, "{}", start);
        } else {
            let _ = write!(ret, "{}..{}", start, end);
        }
    }

    ret
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_range_format() {
        assert_eq!(range_format(&[]), "");
        assert_eq!(range_format(&[4]), "4");
        assert_eq!(range_format(&[0, 1, 2, 5, 7, 8]), "0..2 5 7..8");
        assert_eq!(range_format(&[3, 4, 9, 10, 11]), "3..4 9..11");
    }
}
