use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use hdf5::{
    File as H5File,
    Group,
    LocationType,
};
use shared::{
    bail,
    ensure,
    log,
    range_format,
    Context,
    Result,
};

use crate::store::layout::{
    gaps,
    Entry,
};
use crate::store::payload::{
    copy_dataset,
    copy_missing_attrs,
};


/// Counters of one merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub groups:     usize,
    pub datasets:   usize,
    pub attributes: usize,

    /// Datasets already present in the output, left untouched.
    pub skipped:    usize,
}


impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.groups     += rhs.groups;
        self.datasets   += rhs.datasets;
        self.attributes += rhs.attributes;
        self.skipped    += rhs.skipped;
    }
}


impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} groups, {} datasets and {} attributes copied, {} existing datasets kept",
            self.groups, self.datasets, self.attributes, self.skipped)
    }
}


#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub couplings: usize,
    pub overlaps:  usize,
    pub swaps:     bool,
}


impl RemovalReport {
    pub fn is_empty(&self) -> bool {
        self.couplings == 0 && self.overlaps == 0 && !self.swaps
    }
}


impl fmt::Display for RemovalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} couplings and {} overlaps deleted, swaps {}",
            self.couplings, self.overlaps, if self.swaps { "deleted" } else { "absent" })
    }
}


/// Content of the group of one project, indices sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub name:      String,
    pub points:    Vec<usize>,
    pub overlaps:  Vec<usize>,
    pub couplings: Vec<usize>,
    pub swaps:     bool,
}


impl ProjectSummary {
    pub fn point_gaps(&self) -> Vec<usize> { gaps(&self.points) }
    pub fn overlap_gaps(&self) -> Vec<usize> { gaps(&self.overlaps) }
    pub fn coupling_gaps(&self) -> Vec<usize> { gaps(&self.couplings) }

    /// Indices lacking an overlap or a coupling, sorted and deduplicated.
    pub fn missing_links(&self) -> Vec<usize> {
        let mut ret = self.overlap_gaps();
        ret.extend(self.coupling_gaps());
        ret.sort_unstable();
        ret.dedup();
        ret
    }
}


fn write_indices(f: &mut fmt::Formatter<'_>, what: &str, indices: &[usize]) -> fmt::Result {
    let missing = gaps(indices);
    write!(f, " {:>10} : {:>5}", what, indices.len())?;
    if !indices.is_empty() {
        write!(f, "  [{}]", range_format(indices))?;
    }
    if !missing.is_empty() {
        write!(f, "  missing: {}", range_format(&missing))?;
    }
    writeln!(f)
}


impl fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project {:?}:", self.name)?;
        write_indices(f, "points", &self.points)?;
        write_indices(f, "overlaps", &self.overlaps)?;
        write_indices(f, "couplings", &self.couplings)?;
        writeln!(f, " {:>10} : {}", "swaps", if self.swaps { "present" } else { "absent" })
    }
}


/// An HDF5 file laid out as `/<project>/{point,overlaps,coupling}_<i>`.
pub struct Hdf5Store {
    path: PathBuf,
    file: H5File,
}


impl Hdf5Store {
    pub fn open<P>(path: P) -> Result<Self>
    where P: AsRef<Path> {
        let path = path.as_ref();
        ensure!(path.is_file(), "HDF5 file {:?} not available.", path);
        let file = H5File::open(path)
            .with_context(|| format!("Failed to open {:?} as HDF5 file.", path))?;
        Ok(Self { path: path.to_path_buf(), file })
    }


    pub fn open_rw<P>(path: P) -> Result<Self>
    where P: AsRef<Path> {
        let path = path.as_ref();
        ensure!(path.is_file(), "HDF5 file {:?} not available.", path);
        let file = H5File::open_rw(path)
            .with_context(|| format!("Failed to open {:?} as HDF5 file for writing.", path))?;
        Ok(Self { path: path.to_path_buf(), file })
    }


    /// Opens `path` for writing, creating it if absent.
    pub fn create_or_append<P>(path: P) -> Result<Self>
    where P: AsRef<Path> {
        let path = path.as_ref();
        let file = H5File::append(path)
            .with_context(|| format!("Failed to open or create HDF5 file {:?}.", path))?;
        Ok(Self { path: path.to_path_buf(), file })
    }


    pub fn get_path(&self) -> &Path { &self.path }


    /// Copies every node of `other` missing from this store. Nodes already present are kept.
    pub fn merge_from<P>(&self, other: P) -> Result<MergeStats>
    where P: AsRef<Path> {
        let other = Self::open(other)?;
        let mut stats = MergeStats::default();
        merge_group(&other.file, &self.file, "/", &mut stats)
            .with_context(|| format!("Failed to merge {:?} into {:?}.", other.path, self.path))?;
        self.file.flush()?;
        Ok(stats)
    }


    fn project_group(&self, project: &str) -> Result<Group> {
        ensure!(!project.is_empty() && !project.contains('/'), "Invalid project name {:?}.", project);
        ensure!(self.file.link_exists(project), "Project {:?} not found in {:?}.", project, self.path);
        self.file.group(project)
            .with_context(|| format!("{:?} of {:?} is not a group.", project, self.path))
    }


    /// Deletes the couplings and the swaps of `project`, and its overlaps as well if
    /// `with_overlaps` is set. The points are always kept.
    ///
    /// HDF5 does not reclaim the space of unlinked nodes, use `h5repack` to shrink the file.
    pub fn remove_project_data(&self, project: &str, with_overlaps: bool) -> Result<RemovalReport> {
        let group = self.project_group(project)?;
        let mut report = RemovalReport::default();

        for name in group.member_names()? {
            let remove = match Entry::classify(&name) {
                Entry::Coupling(_) => { report.couplings += 1; true },
                Entry::Overlap(_) if with_overlaps => { report.overlaps += 1; true },
                Entry::Swaps => { report.swaps = true; true },
                _ => false,
            };

            if remove {
                group.unlink(&name)
                    .with_context(|| format!("Failed to delete /{}/{} from {:?}.", project, name, self.path))?;
            }
        }
        self.file.flush()?;

        if report.is_empty() {
            log::warn!("Nothing to delete for project {:?} in {:?}.", project, self.path);
        }
        Ok(report)
    }


    pub fn project_summary(&self, project: &str) -> Result<ProjectSummary> {
        let group = self.project_group(project)?;
        let mut summary = ProjectSummary {
            name: project.to_string(),
            ..Default::default()
        };

        for name in group.member_names()? {
            match Entry::classify(&name) {
                Entry::Point(i)    => summary.points.push(i),
                Entry::Overlap(i)  => summary.overlaps.push(i),
                Entry::Coupling(i) => summary.couplings.push(i),
                Entry::Swaps       => summary.swaps = true,
                Entry::Other       => log::debug!("Unrecognized member /{}/{} skipped.", project, name),
            }
        }

        summary.points.sort_unstable();
        summary.overlaps.sort_unstable();
        summary.couplings.sort_unstable();
        Ok(summary)
    }


    /// Top level groups holding points, overlaps or couplings.
    pub fn projects(&self) -> Result<Vec<String>> {
        let mut ret = vec![];
        for name in self.file.member_names()? {
            if self.file.loc_type_by_name(&name)? != LocationType::Group {
                continue;
            }
            let has_data = self.file.group(&name)?
                .member_names()?
                .iter()
                .any(|m| Entry::classify(m).is_project_data());
            if has_data {
                ret.push(name);
            }
        }
        Ok(ret)
    }
}


fn join_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{}{}", parent, name)
    } else {
        format!("{}/{}", parent, name)
    }
}


fn merge_group(src: &Group, dst: &Group, path: &str, stats: &mut MergeStats) -> Result<()> {
    stats.attributes += copy_missing_attrs(src, dst, path)?;

    for name in src.member_names()? {
        let child = join_path(path, &name);
        let exists = dst.link_exists(&name);

        match src.loc_type_by_name(&name)? {
            LocationType::Group => {
                let target = if !exists {
                    stats.groups += 1;
                    dst.create_group(&name)?
                } else if dst.loc_type_by_name(&name)? == LocationType::Group {
                    dst.group(&name)?
                } else {
                    bail!("{:?} is a group in the input but not in the output.", child);
                };
                merge_group(&src.group(&name)?, &target, &child, stats)?;
            },
            LocationType::Dataset => {
                if exists {
                    log::debug!("{:?} exists in the output, kept.", child);
                    stats.skipped += 1;
                    continue;
                }
                copy_dataset(&src.dataset(&name)?, dst, &name, &child)?;
                stats.datasets += 1;
            },
            _ => {
                log::warn!("{:?} is neither a group nor a dataset, not merged.", child);
            },
        }
    }

    Ok(())
}


/// Merges every store of `inputs` into `output`, created if absent, in the given order.
pub fn merge_stores<P, Q>(inputs: &[P], output: Q) -> Result<MergeStats>
where P: AsRef<Path>,
      Q: AsRef<Path> {
    let output = output.as_ref();
    ensure!(!inputs.is_empty(), "No HDF5 file to merge.");

    let same_file = |a: &Path, b: &Path| match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    for input in inputs.iter().map(AsRef::as_ref) {
        ensure!(input.is_file(), "HDF5 file {:?} to merge not available.", input);
        ensure!(!same_file(input, output), "Cannot merge {:?} into itself.", input);
    }

    let store = Hdf5Store::create_or_append(output)?;
    let mut total = MergeStats::default();

    for input in inputs.iter().map(AsRef::as_ref) {
        let stats = store.merge_from(input)?;
        log::info!("Merged {:?}: {}.", input, stats);
        total += stats;
    }

    Ok(total)
}
