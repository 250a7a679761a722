use std::time::Instant;

use eyre::WrapErr;
use itertools::Itertools;
use speckle_stats_lib::{AnalysisOptions, SpeckleAnalysisBuilder};

use crate::app::*;

// * read cfg
// * check the input paths exist
// * load samples and reference
// * compute statistics
// * output results

pub fn run_app() -> i32 {
    let cfg = arg_parse::parse_args();
    configure_logs(cfg.output_cfg.verbosity);

    let ret = match run_app_inner(&cfg) {
        Ok(()) => 0,
        Err(fatal_error) => {
            print_fatal_err(fatal_error, cfg.output_cfg.verbosity);
            1
        }
    };

    ret
}

fn run_app_inner(cfg: &AppCfg) -> eyre::Result<()> {
    let samples_dir = &cfg.dir_cfg.samples_dir;
    let reference_path = &cfg.dir_cfg.reference_path;

    // Check that the samples and reference both exist
    let non_exist = [samples_dir, reference_path]
        .into_iter()
        .filter(|p| !p.exists());
    match non_exist.collect::<Vec<_>>().as_slice() {
        [] => (),
        missing_paths => {
            return Err(eyre::Report::msg(format!(
                "paths not found: {}",
                missing_paths.iter().map(|p| p.to_string_lossy()).join(", ")
            )));
        }
    }

    match cfg.roi {
        Some(roi) => debug!("Region of interest: {roi}"),
        None => debug!("Region of interest: full frame"),
    }

    let analysis_start = Instant::now();

    let builder = SpeckleAnalysisBuilder::from_options(AnalysisOptions { roi: cfg.roi });
    let report = builder
        .analyze_dirs(samples_dir, reference_path)
        .map_err(AppError::from)
        .wrap_err_with(|| format!("Failed to analyse samples in {}", samples_dir.display()))?;

    trace!(
        "analysis time: {}",
        analysis_start.elapsed().as_secs_f64()
    );

    report_output::print_report(cfg, &report)?;

    Ok(())
}

fn print_fatal_err(fatal_err: eyre::Report, verbosity: ReportVerbosity) {
    for line in fatal_err_lines(&fatal_err, verbosity) {
        error!(target: "app-errorlog", "{}", line);
    }
}

//The default is a single line holding the whole cause chain. Verbose gives each cause its
//own line.
fn fatal_err_lines(fatal_err: &eyre::Report, verbosity: ReportVerbosity) -> Vec<String> {
    match verbosity {
        ReportVerbosity::Verbose => std::iter::once(fatal_err.to_string())
            .chain(
                fatal_err
                    .chain()
                    .skip(1)
                    .map(|e| format!("    caused by: {}", e)),
            )
            .collect(),
        ReportVerbosity::Quiet | ReportVerbosity::Default => {
            vec![fatal_err.chain().join(": ")]
        }
    }
}

pub fn configure_logs(verbosity: ReportVerbosity) {
    use simplelog::*;

    let mut cfg = simplelog::ConfigBuilder::new();
    cfg.set_time_level(LevelFilter::Off);

    let min_loglevel = match verbosity {
        ReportVerbosity::Quiet => LevelFilter::Warn,
        ReportVerbosity::Default => LevelFilter::Info,
        ReportVerbosity::Verbose => LevelFilter::Trace,
    };

    TermLogger::init(
        min_loglevel,
        cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .expect("TermLogger failed to initialize");
}
