pub use log::{info, warn};

use clap::ValueEnum;
use cpblock::ObjectiveKind;

/// Null expectation of the core-periphery objective
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Model {
    /// constant edge density (KM_ER)
    Er,
    /// configuration model, degree corrected (KM_Config)
    Config,
}

impl From<Model> for ObjectiveKind {
    fn from(m: Model) -> Self {
        match m {
            Model::Er => ObjectiveKind::Er,
            Model::Config => ObjectiveKind::Config,
        }
    }
}

/// Set up logging and the global rayon pool.
pub fn init_runtime(verbose: bool, threads: Option<usize>) -> anyhow::Result<()> {
    if verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let max_threads = threads.unwrap_or_else(num_cpus::get).max(1);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(max_threads)
        .build_global()
        .is_err()
    {
        warn!("rayon thread pool was already initialized");
    }
    info!("will use {} threads", rayon::current_num_threads());
    Ok(())
}
