/// Default name of the HDF5 store under `scratch_path` when `path_hdf5` is absent.
pub const DEFAULT_HDF5_NAME:   &str = "quantum.hdf5";
pub const CHUNK_INPUT_NAME:    &str = "input.yml";
pub const LAUNCH_SCRIPT_NAME:  &str = "launch.sh";
pub const CHUNK_FOLDER_PREFIX: &str = "chunk_";
pub const CHUNK_XYZ_PREFIX:    &str = "chunk_xyz_";
pub const DEFAULT_RUN_COMMAND: &str = "run_workflow.py -i input.yml";

pub const POINT_PREFIX:    &str = "point_";
pub const OVERLAP_PREFIX:  &str = "overlaps_";
pub const COUPLING_PREFIX: &str = "coupling_";
pub const SWAPS_NAME:      &str = "swaps";
