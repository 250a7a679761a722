use std::path::PathBuf;

use speckle_common::Roi;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportVerbosity {
    Quiet,
    Default,
    Verbose,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    Normal,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirCfg {
    pub samples_dir: PathBuf,

    // either an image file, or a directory whose first image is used
    pub reference_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCfg {
    pub format: OutputFormat,

    // only affects json output
    pub include_map: bool,

    pub verbosity: ReportVerbosity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCfg {
    pub dir_cfg: DirCfg,

    // None analyses whole frames
    pub roi: Option<Roi>,

    pub output_cfg: OutputCfg,
}
