use log::debug;
use polexpr_rs::{Evaluator, Parser};

fn main() {
    pretty_env_logger::init();

    let expr = "(+ (* x x) (negate (atan2 y z)))";
    let ast = Parser::parse_expression(expr).expect("Failed to parse");
    debug!("ast: {ast:?}");

    println!("prefix:  {}", ast.to_prefix_string());
    println!("postfix: {}", ast);

    match ast.evaluate(&[3.0, 1.0, 1.0]) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }

    let mut evaluator = Evaluator::default();
    for expr in ["(sum)", "(avg)", "(min3)", "(sum x y z)"] {
        let result = evaluator.evaluate_expression(expr, &[1.0, 2.0, 3.0]);
        println!("{expr} => {result:?}");
    }
}
