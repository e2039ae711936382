use crypto_demonstrator::{
    config::Config,
    visualizer::{AdditionForm, Dialog, MultiplicationForm, Outcome, Visualizer},
};
use log::info;
use std::{env, process};

struct StderrDialog;

impl Dialog for StderrDialog {
    fn show_error(&mut self, title: &str, message: &str) {
        eprintln!("{}: {}", title, message);
    }
}

fn report(name: &str, outcome: &Outcome) {
    if outcome.is_real() {
        println!("{}: {}", name, outcome.result);
    } else {
        println!("{}: result is not a real point", name);
    }
    println!("{}", outcome.scene.to_json());
}

fn main() {
    env_logger::init();
    let args = env::args().collect::<Vec<String>>();

    if args.len() > 2 {
        println!("Usage:");
        println!("point_arithmetic [config.json]");
        return;
    }

    let config = match args.get(1) {
        Some(path) => match Config::load(path.trim()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    info!("plotting on x {:?}, y {:?}", config.plot.x_domain, config.plot.y_domain);

    let visualizer = Visualizer::from_config(&config);
    let mut dialog = StderrDialog;

    let addition = AdditionForm::from(&config.addition);
    if let Ok(outcome) = visualizer.submit_addition(&addition, &mut dialog) {
        report("P + Q", &outcome);
    }

    let multiplication = MultiplicationForm::from(&config.multiplication);
    if let Ok(outcome) = visualizer.submit_multiplication(&multiplication, &mut dialog) {
        report(&format!("{} * P", config.multiplication.n), &outcome);
    }
}
