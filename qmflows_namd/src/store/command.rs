use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use shared::{
    bail,
    log,
    Result,
};

use crate::OptProcess;
use crate::store::{
    merge_stores,
    Hdf5Store,
};


#[derive(Debug, Parser)]
/// Merge the HDF5 stores written by the chunk jobs into a single one.
///
/// Nodes already present in the output are kept, so the first input providing a dataset wins.
pub struct MergeCommand {
    #[arg(short='i', long, num_args=1.., required=true)]
    /// HDF5 files to merge, in order of precedence.
    input: Vec<PathBuf>,

    #[arg(short='o', long)]
    /// Merged HDF5 file, created if absent.
    output: PathBuf,
}


impl OptProcess for MergeCommand {
    fn process(&self) -> Result<()> {
        log::info!("Merging {} files into {:?} ...", self.input.len(), self.output);
        let stats = merge_stores(&self.input, &self.output)?;
        log::info!("Merge done: {}.", stats);

        let store = Hdf5Store::open(&self.output)?;
        for project in store.projects()? {
            let summary = store.project_summary(&project)?;
            log::info!("{}", summary);

            let missing = summary.missing_links();
            if !missing.is_empty() {
                log::warn!("Project {:?} lacks overlaps or couplings at {:?}, remove the couplings and \
                           rerun the workflow on {:?} to compute them.", project, missing, self.output);
            }
        }

        Ok(())
    }
}


#[derive(Debug, Parser)]
/// Delete the couplings of a project from an HDF5 store, e.g. before recomputing them on a merged store.
pub struct RemoveCommand {
    #[arg(short='p', long, alias="pn")]
    /// Name of the project whose data is deleted.
    ///
    /// Alias: "pn"
    project_name: String,

    #[arg(long="hdf5", alias="HDF5")]
    /// HDF5 store to modify in place.
    ///
    /// Alias: "HDF5"
    hdf5: PathBuf,

    #[arg(short='o', long)]
    /// Also delete the overlaps.
    overlaps: bool,
}


impl OptProcess for RemoveCommand {
    fn process(&self) -> Result<()> {
        let store = Hdf5Store::open_rw(&self.hdf5)?;
        let report = store.remove_project_data(&self.project_name, self.overlaps)?;
        log::info!("Project {:?} in {:?}: {}.", self.project_name, self.hdf5, report);
        Ok(())
    }
}


#[derive(Debug, Parser)]
/// List the points, overlaps and couplings of the projects in an HDF5 store.
pub struct InspectCommand {
    #[arg(long="hdf5", alias="HDF5")]
    /// HDF5 store to inspect.
    ///
    /// Alias: "HDF5"
    hdf5: PathBuf,

    #[arg(short='p', long, alias="pn")]
    /// Only show this project.
    ///
    /// Alias: "pn"
    project_name: Option<String>,
}


impl OptProcess for InspectCommand {
    fn process(&self) -> Result<()> {
        let store = Hdf5Store::open(&self.hdf5)?;

        let projects = match self.project_name.as_ref() {
            Some(p) => vec![p.clone()],
            None => store.projects()?,
        };
        if projects.is_empty() {
            bail!("No project data found in {:?}.", self.hdf5);
        }
        log::info!("Projects in {:?}: {}", self.hdf5, projects.iter().join(", "));

        for project in projects.iter() {
            println!("{}", store.project_summary(project)?);
        }

        Ok(())
    }
}
