use clap::Parser;
use testreel::cli::{Cli, Commands, PlayArgs};
use testreel::config::{build_config, AppConfig};
use testreel::export::{export_frames, FrameExporter};
use testreel::project::{load_project, Project};
use testreel::tui;

fn main() {
    let cli = Cli::parse();
    let app_config = build_config(&cli);

    if app_config.verbose {
        eprintln!("testreel: effective config: {:?}", app_config);
    }

    let project = match load_project(&cli.project) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("testreel: load error: {}", e);
            std::process::exit(1);
        }
    };

    if app_config.verbose {
        let timeline = &project.timeline;
        eprintln!(
            "testreel: loaded {}: {} rows, {} tests, log time {}..{} ms",
            cli.project.display(),
            timeline.rows.len(),
            timeline.num_tests,
            timeline.min_time,
            timeline.max_time
        );
        for issue in &project.ordering_issues {
            eprintln!("testreel: warning: {}", issue);
        }
    }

    match cli.command {
        None => run_player(&app_config, project, &PlayArgs::default()),
        Some(Commands::Play(ref args)) => run_player(&app_config, project, args),
        Some(Commands::Export(ref args)) => {
            let exporter = FrameExporter::from_config(&project, &app_config);
            if app_config.verbose {
                eprintln!("testreel: export: {:?}", exporter.info());
            }
            match export_frames(&exporter, &args.out, args.from, args.to, app_config.verbose) {
                Ok(count) => {
                    if app_config.verbose {
                        eprintln!(
                            "testreel: export: {} frames in {}",
                            count,
                            args.out.display()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("testreel: export error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Info) => {
            let info = FrameExporter::from_config(&project, &app_config).info();
            print_json(&info);
        }
        Some(Commands::Rows) => print_json(&project.timeline),
    }
}

fn run_player(config: &AppConfig, project: Project, args: &PlayArgs) {
    if config.verbose {
        eprintln!("testreel: TUI mode, start={}s paused={}", args.start, args.paused);
    }
    if let Err(e) = tui::run_tui(config, project, args) {
        eprintln!("testreel: TUI error: {}", e);
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("testreel: serialization error: {}", e);
            std::process::exit(1);
        }
    }
}
