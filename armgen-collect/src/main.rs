use anyhow::Result;
use armgen_core::config::CollectConfig;
use armgen_core::dump;
use armgen_core::planner::PlannerBuilder;
use armgen_core::pool::CollectorPool;
use armgen_core::transition::{StepStatus, Transition, status_counts};
use armgen_planner::planar::PlanarArm;
use armgen_planner::remote::EngineBridge;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
enum PlannerKind {
    Builtin,
    Engine,
}

impl From<String> for PlannerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "builtin" => Self::Builtin,
            "engine" => Self::Engine,
            _ => unreachable!(),
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "config/config.yml")]
    config: PathBuf,

    #[arg(long, default_value = "builtin")]
    planner: PlannerKind,

    #[arg(long)]
    total_samples: Option<usize>,

    #[arg(long)]
    samples_per_file: Option<usize>,

    #[arg(long)]
    workers: Option<usize>,

    #[arg(long)]
    results_dir: Option<String>,
}

fn print_status_dist(batch: &[Transition]) {
    let counts = status_counts(batch);
    let total = batch.len();
    for status in StepStatus::ALL {
        let count = counts[status.code() as usize - 1];
        println!(
            "{}: {} ({})",
            status.code(),
            count,
            count as f32 / total as f32
        );
    }
}

fn run_collection<PB: PlannerBuilder>(builder: Arc<PB>, config: &CollectConfig) -> Result<()> {
    let results_dir = Path::new(&config.output.results_dir);
    std::fs::create_dir_all(results_dir)?;
    let pool = CollectorPool::build(builder, config.collection.workers);
    let mut collected = 0;
    while collected < config.collection.total_samples {
        let start = Instant::now();
        let batch = pool.generate_samples(config.collection.samples_per_file)?;
        println!("data collection took: {:?}", start.elapsed());
        print_status_dist(&batch);
        dump::write_batch(results_dir.join(dump::batch_file_name(collected)), &batch)?;
        collected += batch.len();
    }
    pool.shutdown()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = CollectConfig::load(&args.config)?;
    println!("------------ Config ------------");
    print!("{}", config.to_yaml()?);
    // random-step collection wants unfiltered start/goal pairs
    config.planner.challenging_goals_only = false;
    if let Some(total_samples) = args.total_samples {
        config.collection.total_samples = total_samples;
    }
    if let Some(samples_per_file) = args.samples_per_file {
        config.collection.samples_per_file = samples_per_file;
    }
    if let Some(workers) = args.workers {
        config.collection.workers = workers;
    }
    if let Some(results_dir) = args.results_dir {
        config.output.results_dir = results_dir;
    }
    match args.planner {
        PlannerKind::Builtin => {
            let planner_config = config.planner.clone();
            run_collection(
                Arc::new(move || anyhow::Ok(PlanarArm::from_config(&planner_config))),
                &config,
            )
        }
        PlannerKind::Engine => {
            let bridge = Arc::new(EngineBridge::bind(
                &config.planner.engine_socket,
                config.planner.engine_cmd.clone(),
                config.planner.num_joints,
            )?);
            run_collection(Arc::new(move || bridge.accept()), &config)
        }
    }
}
