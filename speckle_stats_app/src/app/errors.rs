use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Speckle statistics failed")]
    Stats(#[from] speckle_stats_lib::Error),

    #[error("Failed to serialize report")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report")]
    Io(#[from] std::io::Error),
}

pub fn print_error_and_quit(e: eyre::Report) -> ! {
    #[allow(clippy::print_stderr)]
    let () = eprintln!("{:?}", e);
    std::process::exit(1);
}
