use once_cell::sync::Lazy;
use shared::Regex;

use crate::core::{
    COUPLING_PREFIX,
    OVERLAP_PREFIX,
    POINT_PREFIX,
    SWAPS_NAME,
};


/// Role of a member of a project group, derived from its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    /// `point_<i>`: orbitals of geometry `i`.
    Point(usize),
    /// `overlaps_<i>`: overlap matrices between geometries `i` and `i + 1`.
    Overlap(usize),
    /// `coupling_<i>`
    Coupling(usize),
    Swaps,
    Other,
}


static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    let re = format!(r"^({}|{}|{})(\d+)$", POINT_PREFIX, OVERLAP_PREFIX, COUPLING_PREFIX);
    Regex::new(&re).unwrap()
});


impl Entry {
    pub fn classify(name: &str) -> Self {
        if name == SWAPS_NAME {
            return Entry::Swaps;
        }

        let Some(caps) = ENTRY_RE.captures(name) else {
            return Entry::Other;
        };
        let Ok(index) = caps[2].parse::<usize>() else {
            return Entry::Other;
        };

        match &caps[1] {
            POINT_PREFIX    => Entry::Point(index),
            OVERLAP_PREFIX  => Entry::Overlap(index),
            COUPLING_PREFIX => Entry::Coupling(index),
            _ => Entry::Other,
        }
    }

    pub fn is_project_data(self) -> bool {
        !matches!(self, Entry::Swaps | Entry::Other)
    }
}


/// Indices missing from `min ..= max` of `indices`, which must be sorted.
pub fn gaps(indices: &[usize]) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
        return vec![];
    };

    let mut ret = vec![];
    let mut iter = indices.iter().copied().peekable();
    for i in first ..= last {
        if iter.peek() == Some(&i) {
            while iter.peek() == Some(&i) {
                iter.next();
            }
        } else {
            ret.push(i);
        }
    }
    ret
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Entry::classify("point_0"), Entry::Point(0));
        assert_eq!(Entry::classify("overlaps_12"), Entry::Overlap(12));
        assert_eq!(Entry::classify("coupling_7"), Entry::Coupling(7));
        assert_eq!(Entry::classify("swaps"), Entry::Swaps);
        assert_eq!(Entry::classify("point_"), Entry::Other);
        assert_eq!(Entry::classify("point_1a"), Entry::Other);
        assert_eq!(Entry::classify("couplings_1"), Entry::Other);
        assert_eq!(Entry::classify("basis"), Entry::Other);

        assert!(Entry::Overlap(1).is_project_data());
        assert!(!Entry::Swaps.is_project_data());
    }

    #[test]
    fn test_gaps() {
        assert!(gaps(&[]).is_empty());
        assert!(gaps(&[4]).is_empty());
        assert!(gaps(&[0, 1, 2, 3]).is_empty());
        assert_eq!(gaps(&[0, 1, 3, 4, 8]), vec![2, 5, 6, 7]);
        assert_eq!(gaps(&[2, 2, 4]), vec![3]);
    }
}
