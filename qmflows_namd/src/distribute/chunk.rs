use std::ops::Range;

use shared::{
    ensure,
    Result,
};

use crate::core::{
    CHUNK_FOLDER_PREFIX,
    CHUNK_XYZ_PREFIX,
};


/// A contiguous slice of the trajectory processed by one scheduler job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    index:  usize,
    suffix: String,

    /// Frame indices in the full trajectory, counted from 0.
    range:  Range<usize>,
}


impl Chunk {
    /// `width` is the number of letters in the suffix, see [`chunk_suffix`].
    pub fn new(index: usize, width: usize, range: Range<usize>) -> Self {
        Self {
            index,
            suffix: chunk_suffix(index, width),
            range,
        }
    }

    pub fn get_index(&self) -> usize { self.index }
    pub fn get_suffix(&self) -> &str { &self.suffix }
    pub fn get_range(&self) -> Range<usize> { self.range.clone() }
    pub fn len(&self) -> usize { self.range.len() }
    pub fn is_empty(&self) -> bool { self.range.is_empty() }

    pub fn folder_name(&self) -> String { format!("{}{}", CHUNK_FOLDER_PREFIX, self.suffix) }
    pub fn xyz_name(&self) -> String { format!("{}{}", CHUNK_XYZ_PREFIX, self.suffix) }
}


/// Alphabetic suffix as produced by `split -a <width>`: `0 -> "a"`, `25 -> "z"`, and with
/// `width == 2`, `26 -> "ba"`.
pub fn chunk_suffix(index: usize, width: usize) -> String {
    let mut letters = vec![b'a'; width.max(1)];
    let mut rem = index;
    for l in letters.iter_mut().rev() {
        *l = b'a' + (rem % 26) as u8;
        rem /= 26;
    }
    String::from_utf8(letters).unwrap_or_default()
}


/// Letters needed to label `nchunks` chunks uniquely.
pub fn suffix_width(nchunks: usize) -> usize {
    let mut width = 1;
    let mut capacity = 26usize;
    while capacity < nchunks {
        width += 1;
        capacity = capacity.saturating_mul(26);
    }
    width
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    nframes:   usize,
    blocks:    usize,
    chunk_len: usize,
    chunks:    Vec<Chunk>,
}


impl ChunkPlan {
    /// Every chunk holds `ceil(nframes / blocks)` frames except possibly the last one, hence fewer
    /// than `blocks` chunks may come out.
    pub fn new(nframes: usize, blocks: usize) -> Result<Self> {
        ensure!(nframes > 0, "Cannot distribute an empty trajectory.");
        ensure!(blocks > 0, "Number of blocks must be positive.");

        let chunk_len = nframes.div_ceil(blocks);
        let nchunks   = nframes.div_ceil(chunk_len);
        let width     = suffix_width(nchunks);

        let chunks = (0 .. nchunks)
            .map(|i| {
                let start = i * chunk_len;
                let end   = (start + chunk_len).min(nframes);
                Chunk::new(i, width, start .. end)
            })
            .collect();

        Ok(Self { nframes, blocks, chunk_len, chunks })
    }


    pub fn get_nframes(&self) -> usize { self.nframes }
    pub fn get_blocks(&self) -> usize { self.blocks }
    pub fn get_chunk_len(&self) -> usize { self.chunk_len }
    pub fn get_chunks(&self) -> &[Chunk] { &self.chunks }
    pub fn nchunks(&self) -> usize { self.chunks.len() }


    /// Frame indices `i` such that frames `i` and `i + 1` live in different chunks. The overlap
    /// between them is computed by no chunk, so every coupling relying on it is invalid until the
    /// merged trajectory is processed again.
    pub fn seams(&self) -> Vec<usize> {
        let nseams = self.chunks.len().saturating_sub(1);
        self.chunks[.. nseams].iter()
            .map(|c| c.range.end - 1)
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix() {
        assert_eq!(chunk_suffix(0, 1), "a");
        assert_eq!(chunk_suffix(25, 1), "z");
        assert_eq!(chunk_suffix(0, 2), "aa");
        assert_eq!(chunk_suffix(27, 2), "bb");
        assert_eq!(chunk_suffix(26 * 26 - 1, 2), "zz");
        assert_eq!(chunk_suffix(3, 0), "d");

        assert_eq!(suffix_width(1), 1);
        assert_eq!(suffix_width(26), 1);
        assert_eq!(suffix_width(27), 2);
        assert_eq!(suffix_width(676), 2);
        assert_eq!(suffix_width(677), 3);
    }

    #[test]
    fn test_chunk_names() {
        let c = Chunk::new(2, 1, 6 .. 9);
        assert_eq!(c.get_suffix(), "c");
        assert_eq!(c.folder_name(), "chunk_c");
        assert_eq!(c.xyz_name(), "chunk_xyz_c");
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_plan() {
        let plan = ChunkPlan::new(10, 4).unwrap();
        assert_eq!(plan.get_chunk_len(), 3);
        let ranges = plan.get_chunks().iter().map(Chunk::get_range).collect::<Vec<_>>();
        assert_eq!(ranges, vec![0 .. 3, 3 .. 6, 6 .. 9, 9 .. 10]);
        assert_eq!(plan.seams(), vec![2, 5, 8]);

        // ceil(10 / 6) = 2 frames per chunk, only 5 chunks come out
        let plan = ChunkPlan::new(10, 6).unwrap();
        assert_eq!(plan.nchunks(), 5);
        assert!(plan.get_chunks().iter().all(|c| c.len() == 2));

        let plan = ChunkPlan::new(3, 5).unwrap();
        assert_eq!(plan.nchunks(), 3);
        assert_eq!(plan.seams(), vec![0, 1]);

        let plan = ChunkPlan::new(7, 1).unwrap();
        assert_eq!(plan.nchunks(), 1);
        assert!(plan.seams().is_empty());

        assert!(ChunkPlan::new(0, 3).is_err());
        assert!(ChunkPlan::new(3, 0).is_err());
    }

    #[test]
    fn test_plan_covers_trajectory() {
        for nframes in 1 .. 60 {
            for blocks in 1 .. 12 {
                let plan = ChunkPlan::new(nframes, blocks).unwrap();
                let chunks = plan.get_chunks();

                assert!(chunks.len() <= blocks);
                assert_eq!(chunks[0].get_range().start, 0);
                assert_eq!(chunks.last().unwrap().get_range().end, nframes);
                for w in chunks.windows(2) {
                    assert_eq!(w[0].get_range().end, w[1].get_range().start);
                    assert_eq!(w[0].len(), plan.get_chunk_len());
                }
                assert_eq!(plan.seams().len(), chunks.len() - 1);
            }
        }
    }

    #[test]
    fn test_many_chunks() {
        let plan = ChunkPlan::new(30, 30).unwrap();
        assert_eq!(plan.nchunks(), 30);
        assert_eq!(plan.get_chunks()[0].get_suffix(), "aa");
        assert_eq!(plan.get_chunks()[29].get_suffix(), "bd");
    }
}
