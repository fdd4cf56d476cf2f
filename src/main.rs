use cafe_likes::{ActionOutcome, EventQueue, Step};
use colored::*;
use log::error;

fn describe(visibility: (bool, bool)) -> ColoredString {
    match visibility {
        (true, false) => "[ Like ]".green().bold(),
        (false, true) => "[ Unlike ]".red().bold(),
        (false, false) => "(no button)".dimmed(),
        (true, true) => "[ Like ] [ Unlike ]".yellow(),
    }
}

fn print_step(step: &Step) {
    let result = match &step.outcome {
        Ok(ActionOutcome::Applied(state)) => state.to_string().as_str().normal(),
        Ok(ActionOutcome::Skipped) => "skipped".yellow(),
        Err(e) => e.to_string().as_str().red(),
    };
    println!("{:?} -> {}  {}", step.event, result, describe(step.visibility));
}

fn main() {
    let cli_args = match cafe_likes::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    cafe_likes::init_logger(cli_args.log_level.as_ref());

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    let controller = cafe_likes::build_controller(&cli_args);
    let mut queue = EventQueue::new();
    for event in &cli_args.commands {
        queue.push(event.clone());
    }

    let steps = match runtime.block_on(cafe_likes::drive(&controller, &mut queue)) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("{} cafe {}: {}", "failed to load likes for".red().bold(), controller.cafe_id(), e);
            std::process::exit(1);
        }
    };

    for step in &steps {
        print_step(step);
    }
    println!(
        "cafe {}: {}  {}",
        controller.cafe_id(),
        controller.state(),
        describe(controller.buttons().visibility())
    );
}
