pub mod reader;
pub mod writer;

pub use reader::{read_jobs, read_jobs_from_path, JobTable};
pub use writer::{log_summary, write_results, write_results_to_path, write_summary, Summary};

use std::path::{Path, PathBuf};

/// `<input>.costs.csv`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".costs.csv");
    PathBuf::from(name)
}
