use polexpr_rs::Parser;

fn main() {
    pretty_env_logger::init();

    let inputs = [
        "",
        "(+ 1)",
        "(negate 1 2)",
        "(+ 1 2",
        "(+ 1 2))",
        "\t(+\tx w)",
        "(+ - 1 2)",
        "x y",
        "(+ 1 2) (- 3 4)",
    ];

    for input in inputs {
        match Parser::parse_expression(input) {
            Ok(ast) => println!("{:?} parsed as {}\n", input, ast.to_prefix_string()),
            Err(err) => println!("{}\n", err),
        }
    }
}
