use std::fs;
use std::ops::Range;
use std::path::Path;

use crate::{
    bail,
    ensure,
    Context,
    Result,
};


#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub symbol:   String,
    pub position: [f64; 3],
}


/// One geometry of an XYZ trajectory.
///
/// `text` keeps the frame exactly as it appeared in the source file (count line, comment line and
/// atom lines, each terminated by `\n`), so slices of a trajectory can be written back verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub comment: String,
    pub atoms:   Vec<Atom>,
    pub text:    String,
}


impl Frame {
    pub fn natoms(&self) -> usize { self.atoms.len() }
}


#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    pub frames: Vec<Frame>,
}


impl From<Vec<Frame>> for Trajectory {
    fn from(frames: Vec<Frame>) -> Self {
        Self { frames }
    }
}


impl Trajectory {
    pub fn from_file<P>(fname: P) -> Result<Self>
    where P: AsRef<Path> {
        let fname = fname.as_ref();
        ensure!(fname.is_file(), "Trajectory file {:?} not available.", fname);
        let raw = fs::read_to_string(fname)
            .with_context(|| format!("Failed to read trajectory {:?}.", fname))?;
        Self::from_str(&raw)
            .with_context(|| format!("Failed to parse {:?} as XYZ trajectory.", fname))
    }


    pub fn from_str(txt: &str) -> Result<Self> {
        // `raw` keeps the line terminators so frames are written back byte for byte
        let raw = txt.split_inclusive('\n').collect::<Vec<_>>();
        let lines = raw.iter()
            .map(|l| l.trim_end_matches(|c: char| c == '\n' || c == '\r'))
            .collect::<Vec<_>>();
        let nlines = lines.iter()
            .rposition(|l| !l.trim().is_empty())
            .map(|i| i + 1)
            .unwrap_or(0);
        ensure!(nlines > 0, "Empty trajectory.");

        let mut frames = vec![];
        let mut iline  = 0usize;

        while iline < nlines {
            let frame = Self::parse_frame(&lines[iline .. nlines], &raw[iline .. nlines], iline)?;
            iline += frame.natoms() + 2;

            if let Some(first) = frames.first().map(Frame::natoms) {
                ensure!(frame.natoms() == first,
                    "Frame {} has {} atoms while the first frame has {}.", frames.len(), frame.natoms(), first);
            }
            frames.push(frame);
        }

        Ok(Self { frames })
    }


    fn parse_frame(lines: &[&str], raw: &[&str], offset: usize) -> Result<Frame> {
        // only the first token counts, e.g. "3 atoms"
        let natoms = lines[0].split_ascii_whitespace().next()
            .and_then(|tok| tok.parse::<usize>().ok())
            .with_context(|| format!("Line {}: expected atom count, got {:?}.", offset + 1, lines[0]))?;
        ensure!(natoms > 0, "Line {}: atom count cannot be 0.", offset + 1);
        ensure!(lines.len() >= natoms + 2,
            "Line {}: frame truncated, expected {} atoms but only {} lines left.",
            offset + 1, natoms, lines.len().saturating_sub(2));

        let comment = lines[1].trim().to_string();
        let atoms = lines[2 .. natoms + 2].iter()
            .enumerate()
            .map(|(i, l)| Self::parse_atom(l).with_context(|| format!("Line {}: invalid atom line.", offset + i + 3)))
            .collect::<Result<Vec<_>>>()?;

        let mut text = raw[.. natoms + 2].concat();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        Ok(Frame { comment, atoms, text })
    }


    fn parse_atom(line: &str) -> Result<Atom> {
        let mut tokens = line.split_ascii_whitespace();
        let symbol = match tokens.next() {
            Some(s) => s.to_string(),
            None => bail!("Missing element symbol."),
        };

        let mut position = [0.0f64; 3];
        for (i, p) in position.iter_mut().enumerate() {
            let tok = tokens.next().with_context(|| format!("Missing coordinate #{}.", i + 1))?;
            *p = tok.parse::<f64>().with_context(|| format!("Invalid coordinate {:?}.", tok))?;
        }

        Ok(Atom { symbol, position })
    }


    pub fn len(&self) -> usize { self.frames.len() }
    pub fn is_empty(&self) -> bool { self.frames.is_empty() }
    pub fn natoms(&self) -> usize { self.frames.first().map(Frame::natoms).unwrap_or(0) }


    /// Concatenated source text of the frames in `range`.
    pub fn slice(&self, range: Range<usize>) -> String {
        self.frames[range].iter()
            .map(|f| f.text.as_str())
            .collect()
    }


    pub fn write_slice<P>(&self, range: Range<usize>, fname: P) -> Result<()>
    where P: AsRef<Path> {
        ensure!(range.end <= self.len(), "Slice {:?} out of trajectory with {} frames.", range, self.len());
        fs::write(fname.as_ref(), self.slice(range))
            .with_context(|| format!("Failed to write trajectory slice to {:?}.", fname.as_ref()))
    }
}
