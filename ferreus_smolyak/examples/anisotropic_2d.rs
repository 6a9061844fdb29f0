use ferreus_smolyak::{
    create_evaluation_grid, point_arrays_to_csv,
    progress::{closure_sink, ProgressMsg},
    InterpolantSettings, SmolyakInterpolator, SmolyakTestFunctions,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let (sink, listener) = closure_sink(64, |msg: ProgressMsg| match msg {
        ProgressMsg::IndexSetBuilt {
            dimensions,
            mu_max,
            num_elements,
        } => println!("index set: d = {dimensions}, mu = {mu_max}, {num_elements} elements"),
        ProgressMsg::SystemSolved {
            rank,
            num_basis,
            condition_number,
            max_residual,
        } => println!(
            "solved: rank {rank}/{num_basis}, condition {condition_number:.3e}, residual {max_residual:.3e}"
        ),
        other => println!("{other:?}"),
    });

    // Dense validation grid over the canonical square.
    let targets = create_evaluation_grid(&[(-1.0, 1.0), (-1.0, 1.0)], &[101, 101])?;
    let exact = SmolyakTestFunctions::gaussian_ridge_2d(targets.as_ref());

    // 2 x1 exp(-4 x1^2 - 16 x2^2) varies faster along x2.
    for level_vector in [vec![5, 5], vec![4, 6], vec![6, 6]] {
        let settings = InterpolantSettings::builder(level_vector.clone()).build();
        let mut interpolator = SmolyakInterpolator::builder(settings)
            .progress_callback(sink.clone())
            .build()?;

        let values =
            SmolyakTestFunctions::gaussian_ridge_2d(interpolator.grid_points().as_ref());
        interpolator.fit_values(&values)?;

        let predicted = interpolator.evaluate(&targets)?;
        let max_err = (0..targets.nrows())
            .map(|i| (predicted[(i, 0)] - exact[(i, 0)]).abs())
            .fold(0.0, f64::max);

        println!(
            "levels {:?}: {} points, max error {:.3e}",
            level_vector,
            interpolator.num_points(),
            max_err
        );

        let name = format!(
            "smolyak_{}.csv",
            level_vector
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join("_")
        );
        point_arrays_to_csv(targets.as_ref(), predicted.as_ref(), &name)?;
    }

    drop(sink);
    let _ = listener.join();

    Ok(())
}
