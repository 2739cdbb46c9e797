use RustedCalculus::Utils::logger::init_logger;
use RustedCalculus::symbolic::calculus_api::{IntegrationMode, differentiate, integrate};
use RustedCalculus::symbolic::symbolic_context::{CalculusEngine, EngineConfig};
use log::LevelFilter;

fn main() {
    init_logger(LevelFilter::Info, false);
    println!("=== Derivatives ===\n");
    for input in ["x^3", "3sin(x)+x²", "x*e^(2x)", "ln|x|", "arctan(x)/x"] {
        match differentiate(input, "x") {
            Ok(derivative) => println!("d/dx {} = {}", input, derivative),
            Err(e) => println!("d/dx {} failed: {}", input, e),
        }
    }

    println!("\n=== Indefinite integrals ===\n");
    for input in [
        "x^2+sin(x)",
        "e^x/(1+e^x)",
        "1/(x^2+4)",
        "x*ln(x)",
        "sqrt(9-x^2)",
        "x*tan(x)",
    ] {
        match integrate(input, "x", IntegrationMode::Indefinite, None, None) {
            Ok(result) => {
                println!("∫ {} dx = {}", input, result.formula);
                for step in &result.steps {
                    println!("    {}", step);
                }
            }
            Err(e) => println!("∫ {} dx failed: {}", input, e),
        }
    }

    println!("\n=== Definite integrals ===\n");
    for (input, a, b) in [("sin(x)", "0", "π"), ("e^(x^2)", "0", "1"), ("cos(x^2)", "0", "√π")] {
        match integrate(input, "x", IntegrationMode::Definite, Some(a), Some(b)) {
            Ok(result) => println!(
                "∫ {} dx on [{}, {}] = {:?}   ({})",
                input,
                a,
                b,
                result.value,
                result.steps.last().map(String::as_str).unwrap_or("")
            ),
            Err(e) => println!("∫ {} dx on [{}, {}] failed: {}", input, a, b, e),
        }
    }

    println!("\n=== Engine of your own ===\n");
    let engine = CalculusEngine::new(EngineConfig::sequential());
    if let Ok(result) = engine.integrate_text("x*cos(x)-2/x", "x", IntegrationMode::Indefinite, None, None) {
        println!("sequential engine: {}", result.formula);
    }
    println!("cache entries (derivatives, integrals): {:?}", engine.cache_sizes());
}
