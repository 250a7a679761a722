use std::path::{Path, PathBuf};

use clap::{value_parser, ArgAction::*};
use speckle_common::Roi;
use speckle_stats_lib::DEFAULT_ROI;

use crate::app::*;

// file specification
const SAMPLES_DIR: &str = "Samples directory";
const REFERENCE_PATH: &str = "Reference path";

// region of interest
const ROI: &str = "Region of interest";
const FULL_FRAME: &str = "Full frame";

//output settings
const OUTPUT_FORMAT: &str = "Format";
const INCLUDE_MAP: &str = "Include map";

// Arg specification
const ARGS_FILE: &str = "Args file";

//Verbosity
const VERBOSITY_QUIET: &str = "Quiet";
const VERBOSITY_VERBOSE: &str = "Verbose";

const DISPLAY_ORDERING: [&str; 9] = [
    //
    // file specification
    SAMPLES_DIR,
    REFERENCE_PATH,
    //
    // region of interest
    ROI,
    FULL_FRAME,
    //
    //outputs
    OUTPUT_FORMAT,
    INCLUDE_MAP,
    //
    //verbosity
    VERBOSITY_QUIET,
    VERBOSITY_VERBOSE,
    //argument replacement
    ARGS_FILE,
];

fn build_app() -> clap::Command {
    let get_ordering = |arg_name: &str| -> usize {
        match DISPLAY_ORDERING.iter().position(|x| *x == arg_name) {
            Some(idx) => idx,
            None => {
                panic!("argument not assigned a display order: {arg_name:?}");
            }
        }
    };

    let default_roi_help = format!(
        "Only analyse this region of every image, given as x,y,width,height in pixels. Defaults to {DEFAULT_ROI}"
    );

    //args are not added through method chaining because rustfmt struggles with very long expressions.
    let mut clap_app = clap::Command::new("Speckle statistics")
        .version(clap::crate_version!())
        .about("Measure how a stack of speckle images fluctuates, and how its average compares to a reference image");

    clap_app = clap_app.arg(
        clap::Arg::new(SAMPLES_DIR)
            .long("samples")
            .required_unless_present(ARGS_FILE)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("Directory containing the sample images. Every image file directly inside it is loaded, in file name order.")
            .display_order(get_ordering(SAMPLES_DIR)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(REFERENCE_PATH)
            .long("reference")
            .required_unless_present(ARGS_FILE)
            .num_args(1)
            .value_parser(value_parser!(PathBuf))
            .help("The reference image, or a directory whose first image (in file name order) is the reference.")
            .display_order(get_ordering(REFERENCE_PATH)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(ROI)
            .long("roi")
            .num_args(1)
            .value_parser(value_parser!(Roi))
            .conflicts_with(FULL_FRAME)
            .help(default_roi_help)
            .display_order(get_ordering(ROI)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(FULL_FRAME)
            .long("full-frame")
            .help("Analyse whole images instead of a region of interest")
            .action(SetTrue)
            .num_args(0)
            .display_order(get_ordering(FULL_FRAME)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(OUTPUT_FORMAT)
            .long("format")
            .help("Whether to output as normal text, or JSON.")
            .value_parser(value_parser!(OutputFormat))
            .default_value("normal")
            .num_args(1)
            .display_order(get_ordering(OUTPUT_FORMAT)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(INCLUDE_MAP)
            .long("include-map")
            .help("Include the per-pixel standard deviation map in JSON output")
            .action(SetTrue)
            .num_args(0)
            .display_order(get_ordering(INCLUDE_MAP)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(ARGS_FILE)
            .long("args-file")
            .value_parser(value_parser!(PathBuf))
            .num_args(1)
            .help("Read command line arguments from a file. If this argument is used it must be the only argument")
            .display_order(get_ordering(ARGS_FILE)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_QUIET)
            .long("quiet")
            .help("Reduced verbosity")
            .conflicts_with(VERBOSITY_VERBOSE)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_QUIET)),
    );

    clap_app = clap_app.arg(
        clap::Arg::new(VERBOSITY_VERBOSE)
            .long("verbose")
            .help("Increased verbosity")
            .conflicts_with(VERBOSITY_QUIET)
            .action(SetTrue)
            .display_order(get_ordering(VERBOSITY_VERBOSE)),
    );

    clap_app
}

pub fn parse_args() -> AppCfg {
    //capture the cwd once, to minimize the risk of working with two values if it is changed by the OS at runtime.
    let cwd = std::env::current_dir().expect("failed to extract cwd");

    //Start by parsing the provided arguments from the commandline. If the --args-file
    //argument is provided, then we will ignore the true command line arguments and
    //take the arguments from the file instead.
    let args = get_args_from_cmdline_or_file();

    cfg_from_matches(&args, &cwd)
}

fn cfg_from_matches(args: &clap::ArgMatches, cwd: &Path) -> AppCfg {
    let dir_cfg = DirCfg {
        samples_dir: absolutify_path(
            cwd,
            args.get_one::<PathBuf>(SAMPLES_DIR)
                .expect("This argument is required"),
        ),
        reference_path: absolutify_path(
            cwd,
            args.get_one::<PathBuf>(REFERENCE_PATH)
                .expect("This argument is required"),
        ),
    };

    let roi = if args.get_flag(FULL_FRAME) {
        None
    } else {
        Some(args.get_one::<Roi>(ROI).copied().unwrap_or(DEFAULT_ROI))
    };

    let verbosity = if args.get_flag(VERBOSITY_QUIET) {
        ReportVerbosity::Quiet
    } else if args.get_flag(VERBOSITY_VERBOSE) {
        ReportVerbosity::Verbose
    } else {
        ReportVerbosity::Default
    };

    let output_cfg = OutputCfg {
        format: *args
            .get_one::<OutputFormat>(OUTPUT_FORMAT)
            .expect("This argument has a default value"),
        include_map: args.get_flag(INCLUDE_MAP),
        verbosity,
    };

    let ret = AppCfg {
        dir_cfg,
        roi,
        output_cfg,
    };

    ret
}

// Arguments are always first read from the command line, but if --args-file
// is present, then arguments are actually located in a file on disk.
// This fn obtains the args from the correct location.
fn get_args_from_cmdline_or_file() -> clap::ArgMatches {
    let cmdline_args = build_app().get_matches();

    match cmdline_args.get_one::<PathBuf>(ARGS_FILE) {
        None => cmdline_args,
        Some(args_path) => get_argsfile_args(args_path),
    }
}

fn get_argsfile_args(argsfile_path: &Path) -> clap::ArgMatches {
    let args = read_argsfile(argsfile_path)
        .map_err(|e| {
            e.wrap_err(format!(
                "Failed to parse args file at location {}",
                argsfile_path.to_string_lossy()
            ))
        })
        .unwrap_or_else(|e| print_error_and_quit(e));

    //When parsing args from file, the binary name will not be present,
    // so update the parser that we use to not expect it.
    let matches = build_app().no_binary_name(true).get_matches_from(args);
    matches
}

fn read_argsfile(argsfile_path: &Path) -> eyre::Result<Vec<String>> {
    let argsfile_text = std::fs::read_to_string(argsfile_path)?;

    //the arguments file needs to be split into args in the same way as the shell would do it.
    //call out to an external crate for this.
    let args = shell_words::split(&strip_comment_lines(&argsfile_text))?;
    Ok(args)
}

// Whole-line comments only: '#' is legal inside file names.
fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn absolutify_path(cwd: &Path, path: &Path) -> PathBuf {
    //get the absolute path if it is not absolute, by prepending the cwd.
    let path = if path.is_relative() {
        cwd.join(path)
    } else {
        path.to_path_buf()
    };

    //now try canonicalizing the path. If that fails then carry on with the joined path;
    //missing paths are reported later.
    let p = path.canonicalize().unwrap_or(path);

    p
}
