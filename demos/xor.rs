use rprop_nn::{train_network, Algorithm, Dataset, Matrix, TrainConfig};

fn main() -> rprop_nn::Result<()> {
    env_logger::init();

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];
    let data = Dataset::from_rows(inputs.clone(), expected_outputs)?;

    for algorithm in [Algorithm::RpropPlus, Algorithm::RpropMinus, Algorithm::Sag, Algorithm::Slr] {
        let config = TrainConfig {
            hidden: vec![3],
            algorithm,
            linear_output: false,
            repetitions: 4,
            seed: Some(42),
            ..TrainConfig::default()
        };
        let trained = train_network(&data, &config)?;

        println!("{algorithm}: {} of {} repetition(s) converged", trained.converged(), trained.requested);
        let Some(best) = trained.best() else {
            continue;
        };
        println!("  best: repetition {} after {} steps, error {:.6}", best.repetition + 1, best.steps, best.error);

        let prediction = trained.compute(&Matrix::from_data(inputs.clone()), best.repetition)?;
        for (input, out) in inputs.iter().zip(prediction.net_result.column(0)) {
            println!("  Input: {input:?} -> Output: {out:.4}");
        }
    }
    Ok(())
}
