use polexpr_rs::Evaluator;

fn main() {
    pretty_env_logger::init();

    let rows = vec![
        vec![120.0, 3000.0, 2.0],
        vec![80.0, 6000.0, 4.0],
        vec![95.5, 4500.0, 8.0],
    ];

    let expression = "(/ (* x y) z)";

    let mut evaluator = Evaluator::new(100);
    let results = evaluator.evaluate_batch(expression, &rows).unwrap();
    for (i, result) in results.iter().enumerate() {
        println!("Result {}: {:?}", i, result);
    }
}
