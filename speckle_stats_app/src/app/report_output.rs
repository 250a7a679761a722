use std::{
    io::{prelude::*, BufWriter},
    path::Path,
};

use serde::Serialize;
use serde_json::json;
use speckle_common::Roi;
use speckle_stats_lib::SpeckleReport;

use crate::app::{AppCfg, AppError, OutputFormat};

//Struct only exists to be serialized.
#[derive(Serialize)]
struct JsonReport<'a> {
    samples_dir: &'a Path,
    reference_path: &'a Path,
    roi: Option<Roi>,

    #[serde(flatten)]
    report: &'a SpeckleReport,

    #[serde(skip_serializing_if = "Option::is_none")]
    dispersion: Option<Vec<Vec<f64>>>,
}

pub fn format_normal(report: &SpeckleReport) -> String {
    format!(
        "The average standard deviation is [{:.6}]\nThe correlation coefficient with the reference image is [{:.6}]",
        report.mean_std_dev(),
        report.correlation()
    )
}

pub fn format_json(cfg: &AppCfg, report: &SpeckleReport) -> serde_json::Value {
    let dispersion = cfg.output_cfg.include_map.then(|| {
        report
            .dispersion()
            .outer_iter()
            .map(|row| row.to_vec())
            .collect::<Vec<_>>()
    });

    json!(JsonReport {
        samples_dir: &cfg.dir_cfg.samples_dir,
        reference_path: &cfg.dir_cfg.reference_path,
        roi: cfg.roi,
        report,
        dispersion,
    })
}

#[allow(clippy::print_stdout)]
pub fn print_report(cfg: &AppCfg, report: &SpeckleReport) -> Result<(), AppError> {
    match cfg.output_cfg.format {
        OutputFormat::Normal => {
            println!("{}", format_normal(report));
        }
        OutputFormat::Json => {
            let mut stdout = BufWriter::new(std::io::stdout());
            serde_json::to_writer_pretty(&mut stdout, &format_json(cfg, report))?;
            stdout.flush()?;
            println!();
        }
    }

    Ok(())
}
