use parsemath::{Evaluator, Result as EvalResult, Value};
use std::io::{self, BufRead, Write};

/// Formats an evaluation outcome the same way for argument and interactive use.
fn report(result: EvalResult<Value>) -> Result<String, String> {
    result
        .map(|value| value.to_string())
        .map_err(|why| format!("Error: {}", why))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut evaluator = Evaluator::new();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        match report(evaluator.eval(&args.join(" "))) {
            Ok(value) => println!("{}", value),
            Err(why) => {
                eprintln!("{}", why);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            match report(evaluator.eval(&line)) {
                Ok(value) => println!("{}", value),
                Err(why) => eprintln!("{}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
