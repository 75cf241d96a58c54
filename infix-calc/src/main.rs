use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

use infix_calc::{Error, Postfix, RpnConverter, RpnEvaluator, Tokenizer};

fn run(args: &[OsString]) -> Result<(), Error> {
    let [_, input] = args else {
        let program = args
            .first()
            .map_or("infix-calc".into(), |arg| arg.to_string_lossy());
        return Err(Error::Usage {
            program: program.into_owned(),
        });
    };

    let tokens = Tokenizer::tokenize_bytes(input.as_encoded_bytes())?;
    println!(
        "tokens: {}",
        infix_calc::render(&tokens, &Postfix::source_order(tokens.len()))
    );

    let rpn = RpnConverter::convert(&tokens)?;
    println!("rpn: {}", infix_calc::render(&tokens, &rpn));

    let result = RpnEvaluator::evaluate(&rpn, &tokens)?;
    println!("result: {}", result);

    Ok(())
}

fn main() -> ExitCode {
    infix_calc::init_tracing();

    let args: Vec<OsString> = env::args_os().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("E: {}", e);
            ExitCode::FAILURE
        }
    }
}
