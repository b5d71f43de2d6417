use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use evtol_sizer::aircraft::{Aircraft, HingeLoads};
use evtol_sizer::base::units::{j_to_kwh, w_to_hp};
use evtol_sizer::export::ConceptStore;
use evtol_sizer::{Study, StudyOutcome, config, hinge};

#[derive(Parser)]
#[command(author, version, about = "Conceptual sizing of eVTOL aircraft")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Size a concept and print its mass breakdown
    Size(SizeArgs),
    /// Print a stored concept
    Show(ShowArgs),
    /// Hinge shear and moment of a folding-wing concept
    Hinge(HingeArgs),
}

#[derive(Args)]
struct SizeArgs {
    /// Aircraft concept file (YAML or TOML)
    #[arg(long)]
    aircraft: PathBuf,

    /// Sizing/hinge settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// External phase power table (W)
    #[arg(long)]
    powers: Option<PathBuf>,

    /// Initial total mass guess in kg
    #[arg(long)]
    initial_mass: Option<f64>,

    /// Inner-loop tolerance in kg
    #[arg(long)]
    tolerance: Option<f64>,

    /// Inner-loop iteration budget
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Directory for CSV tables (and the plot)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Render the convergence plot into the output directory
    #[arg(long, default_value_t = false)]
    plot: bool,

    /// Concept store directory; the sized concept is saved there
    #[arg(long)]
    store: Option<PathBuf>,

    /// Version to save under (defaults to the next free one)
    #[arg(long, requires = "store")]
    save_version: Option<u32>,
}

#[derive(Args)]
struct ShowArgs {
    #[arg(long)]
    store: PathBuf,
    #[arg(long)]
    name: String,
    /// Defaults to the latest stored version
    #[arg(long)]
    version: Option<u32>,
}

#[derive(Args)]
struct HingeArgs {
    /// Concept file; sized before the hinge is evaluated
    #[arg(long, conflicts_with = "store")]
    aircraft: Option<PathBuf>,

    /// Concept store holding an already sized concept
    #[arg(long, requires = "name")]
    store: Option<PathBuf>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    version: Option<u32>,

    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the spanwise distribution to this CSV file (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Size(args) => size(args),
        Command::Show(args) => show(args),
        Command::Hinge(args) => hinge_command(args),
    }
}

fn size(args: SizeArgs) -> anyhow::Result<()> {
    let mut study = Study::load(&args.aircraft, args.settings.as_deref(), args.powers.as_deref())
        .with_context(|| format!("loading {}", args.aircraft.display()))?;
    let sizing = &mut study.settings.sizing;
    if let Some(mass) = args.initial_mass {
        sizing.initial_mass = mass;
    }
    if let Some(tolerance) = args.tolerance {
        sizing.tolerance = tolerance;
    }
    if let Some(max_iterations) = args.max_iterations {
        sizing.max_iterations = max_iterations;
    }

    let outcome = study.run()?;
    print_summary(&outcome);

    if let Some(dir) = &args.output {
        for path in outcome.write_artifacts(dir, args.plot)? {
            println!("wrote {}", path.display());
        }
    } else if args.plot {
        bail!("--plot needs --output to know where to write the image");
    }
    if let Some(dir) = &args.store {
        let path = outcome.save(&ConceptStore::new(dir), args.save_version)?;
        println!("saved {}", path.display());
    }
    Ok(())
}

fn show(args: ShowArgs) -> anyhow::Result<()> {
    let store = ConceptStore::new(&args.store);
    let stored = match args.version {
        Some(version) => store.load(&args.name, version)?,
        None => store.load_latest(&args.name)?,
    };
    println!(
        "{} v{} (saved {})",
        stored.aircraft.name, stored.version, stored.saved_at
    );
    print_aircraft(&stored.aircraft);
    Ok(())
}

fn hinge_command(args: HingeArgs) -> anyhow::Result<()> {
    let settings = args
        .settings
        .as_deref()
        .map(config::load_settings)
        .transpose()?
        .unwrap_or_default();

    let mut aircraft = match (&args.aircraft, &args.store, &args.name) {
        (Some(path), _, _) => {
            let study = Study {
                aircraft: config::load_single_aircraft(path)?,
                settings: settings.clone(),
                powers: None,
            };
            study.run()?.aircraft
        }
        (None, Some(dir), Some(name)) => {
            let store = ConceptStore::new(dir);
            match args.version {
                Some(version) => store.load(name, version)?.aircraft,
                None => store.load_latest(name)?.aircraft,
            }
        }
        _ => bail!("either --aircraft or --store with --name is required"),
    };

    let loads = hinge::apply_hinge_loads(
        &mut aircraft,
        &settings.hinge.policy,
        settings.hinge.stations,
    )?;
    print_hinge(&aircraft.name, &loads);
    if let Some(path) = &args.output {
        evtol_sizer::export::write_hinge_distribution(path, &loads)?;
    }
    Ok(())
}

fn print_summary(outcome: &StudyOutcome) {
    let report = &outcome.report;
    println!(
        "{}: converged in {} outer / {} inner iterations",
        outcome.aircraft.name,
        report.outer_iterations(),
        report.inner_iterations
    );
    print_aircraft(&outcome.aircraft);
    if let Some(loads) = &outcome.hinge {
        print_hinge(&outcome.aircraft.name, loads);
    }
}

fn print_aircraft(aircraft: &Aircraft) {
    let Some(total) = aircraft.total_mass else {
        println!("  (not sized)");
        return;
    };
    println!("  total mass      {total:>10.1} kg");
    if let Some(area) = aircraft.wing.area {
        println!("  wing area       {area:>10.2} m²");
    }
    if let Some(power) = aircraft.hover_power {
        println!("  hover power     {:>10.1} kW ({:.0} hp)", power / 1e3, w_to_hp(power));
    }
    if let Some(power) = aircraft.cruise_power {
        println!("  cruise power    {:>10.1} kW", power / 1e3);
    }
    if let Some(energy) = aircraft.mission_energy {
        println!("  mission energy  {:>10.1} kWh", j_to_kwh(energy));
    }
    if let Some(tree) = &aircraft.mass_breakdown {
        println!("{tree}");
    }
}

fn print_hinge(name: &str, loads: &HingeLoads) {
    println!(
        "{name}: hinge at η = {:.2}, shear {:.1} N, moment {:.1} N·m",
        loads.eta_hinge, loads.shear, loads.moment
    );
}
