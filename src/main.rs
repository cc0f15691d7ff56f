// Most of the crate lives in the library; this binary trains the XOR table
// with an optional JSON config, e.g.
//   RUST_LOG=info cargo run -- config.json
use std::process::ExitCode;

use log::error;
use rprop_nn::{train_network, Dataset, TrainConfig};

fn run() -> rprop_nn::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => TrainConfig::load_json(&path)?,
        None => TrainConfig {
            hidden: vec![2],
            linear_output: false,
            seed: Some(1),
            repetitions: 3,
            ..TrainConfig::default()
        },
    };

    let data = Dataset::from_rows(
        vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
    )?;

    let trained = train_network(&data, &config)?;
    if let Some(message) = trained.warning() {
        println!("{message}");
    }
    if let Some(table) = &trained.result_table {
        for (r, name) in table.row_names.iter().enumerate() {
            let values: Vec<String> = table.columns.iter().map(|c| format!("{:>12.6}", c[r])).collect();
            println!("{name:<24}{}", values.join(""));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
