//! ogupta command-line interface.
//!
//! One binary exposing the Gupta potential toolbox over XYZ coordinate
//! files:
//!
//! ```bash
//! # Potential energy of a structure
//! ogupta energy cluster.xyz
//!
//! # Gradient (full matrix, or just its norm)
//! ogupta forces cluster.xyz
//! ogupta forces cluster.xyz --norm
//!
//! # Hessian matrix
//! ogupta hessian cluster.xyz
//!
//! # Bond-distance report
//! ogupta bonds cluster.xyz
//!
//! # L-BFGS relaxation; writes opt-cluster.xyz
//! ogupta opt cluster.xyz
//!
//! # Write an ogupta.cfg settings template
//! ogupta config
//! ```

use ogupta::bonds::bond_report;
use ogupta::io::{energy_from_comment, read_xyz, write_xyz, XyzFile};
use ogupta::optimizer::minimize;
use ogupta::potential::Gupta;
use ogupta::settings::{Settings, CONFIG_FILE};
use std::env;
use std::error::Error;
use std::path::Path;
use std::process;

fn main() {
    // Initialize console logger for all commands
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let command = args[1].as_str();
    if command == "--help" || command == "-h" {
        print_usage(&args[0]);
        process::exit(0);
    }

    let settings = Settings::load();

    let result = match command {
        "energy" => {
            require_file(&args).and_then(|file| run_energy(file, args.iter().any(|a| a == "--coords")))
        }
        "forces" => {
            require_file(&args).and_then(|file| run_forces(file, args.iter().any(|a| a == "--norm")))
        }
        "hessian" => require_file(&args).and_then(run_hessian),
        "bonds" => require_file(&args).and_then(|file| run_bonds(file, &settings)),
        "opt" => require_file(&args).and_then(|file| run_opt(file, &settings)),
        "config" => run_config(),
        _ => {
            eprintln!("Error: Unknown command: {}", command);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Extracts the mandatory XYZ file argument of a subcommand.
fn require_file(args: &[String]) -> Result<&str, Box<dyn Error>> {
    args.get(2)
        .map(String::as_str)
        .filter(|a| !a.starts_with('-'))
        .ok_or_else(|| format!("Missing file argument for '{}'", args[1]).into())
}

/// Computes the potential energy of a structure, or echoes its coordinates.
fn run_energy(file: &str, print_coords: bool) -> Result<(), Box<dyn Error>> {
    let XyzFile { cluster, .. } = read_xyz(Path::new(file))?;

    if print_coords {
        println!("Coordinates:");
        for i in 0..cluster.num_atoms {
            let [x, y, z] = cluster.atom_coords(i);
            println!("{:<2}  {:14.8}  {:14.8}  {:14.8}", cluster.elements[i], x, y, z);
        }
        return Ok(());
    }

    let gupta = Gupta::for_cluster(&cluster)?;
    let energy = gupta.energy(&cluster.coords)?;
    println!("Energy: {:.6} eV", energy);
    Ok(())
}

/// Computes the gradient of a structure, as a matrix or a single norm.
fn run_forces(file: &str, norm_only: bool) -> Result<(), Box<dyn Error>> {
    let XyzFile { cluster, .. } = read_xyz(Path::new(file))?;
    let gupta = Gupta::for_cluster(&cluster)?;
    let gradient = gupta.gradient(&cluster.coords)?;

    if norm_only {
        println!("Gradient Norm: {:.6}", gradient.norm());
    } else {
        println!("Gradient Matrix:");
        for i in 0..cluster.num_atoms {
            println!(
                "{:<2}  {:14.8}  {:14.8}  {:14.8}",
                cluster.elements[i],
                gradient[3 * i],
                gradient[3 * i + 1],
                gradient[3 * i + 2]
            );
        }
    }
    Ok(())
}

/// Computes and prints the 3n x 3n Hessian matrix of a structure.
fn run_hessian(file: &str) -> Result<(), Box<dyn Error>> {
    let XyzFile { cluster, .. } = read_xyz(Path::new(file))?;
    let gupta = Gupta::for_cluster(&cluster)?;
    let hessian = gupta.hessian(&cluster.coords)?;

    println!("Hessian Matrix:");
    for row in 0..hessian.nrows() {
        let line: Vec<String> = (0..hessian.ncols())
            .map(|col| format!("{:14.8}", hessian[(row, col)]))
            .collect();
        println!("{}", line.join("  "));
    }
    Ok(())
}

/// Prints the bond-distance report of a structure.
fn run_bonds(file: &str, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let XyzFile { cluster, .. } = read_xyz(Path::new(file))?;
    let report = bond_report(&cluster, settings.bonds.threshold);

    if report.bonds.is_empty() {
        println!(
            "No bond distances below or equal to {} Å were found.",
            settings.bonds.threshold
        );
        return Ok(());
    }

    println!("Bond distances in Angstroms (Å):");
    for (number, bond) in report.bonds.iter().enumerate() {
        println!(
            "{}. {}-{}: {:.6}",
            number + 1,
            cluster.elements[bond.i],
            cluster.elements[bond.j],
            bond.distance
        );
    }
    if let Some(mean) = report.mean_distance {
        println!();
        println!("Average bond distance: {:.6} Å", mean);
    }
    Ok(())
}

/// Relaxes a structure and writes the result to `opt-<input name>`.
fn run_opt(file: &str, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let path = Path::new(file);
    let XyzFile {
        mut cluster,
        comment,
    } = read_xyz(path)?;
    let gupta = Gupta::for_cluster(&cluster)?;

    if settings.general.print_level >= 1 {
        println!("Relaxing {} ({} atoms)", cluster.formula(), cluster.num_atoms);
        if let Some(previous) = energy_from_comment(&comment) {
            println!("Previous energy from comment line: {:.6} eV", previous);
        }
    }

    let result = minimize(&gupta, &mut cluster.coords, &settings.optimizer.to_config())?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("Invalid file name: {}", file))?;
    let output = path.with_file_name(format!("opt-{}", file_name));

    write_xyz(&cluster, &format!("{:.6}", result.energy), &output)?;

    println!(
        "Final energy: {:.6} eV after {} iterations{}",
        result.energy,
        result.iterations,
        if result.converged {
            ""
        } else {
            " (not converged)"
        }
    );
    println!("Optimization complete. Output saved to {}", output.display());
    Ok(())
}

/// Writes an `ogupta.cfg` settings template to the working directory.
fn run_config() -> Result<(), Box<dyn Error>> {
    let path = Path::new(CONFIG_FILE);
    Settings::create_template(path)?;
    println!("Settings template created: {}", path.display());
    println!("Edit the file to override the built-in defaults.");
    Ok(())
}

/// Prints usage information to stderr.
fn print_usage(program_name: &str) {
    eprintln!("ogupta - Gupta potential energies, derivatives and relaxation");
    eprintln!("for Fe/Co/Ni transition-metal clusters");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} energy <file.xyz> [--coords]", program_name);
    eprintln!("                    Potential energy (or echo the coordinates)");
    eprintln!();
    eprintln!("  {} forces <file.xyz> [--norm]", program_name);
    eprintln!("                    Gradient matrix (or only its norm)");
    eprintln!();
    eprintln!("  {} hessian <file.xyz>", program_name);
    eprintln!("                    Hessian matrix (3n x 3n)");
    eprintln!();
    eprintln!("  {} bonds <file.xyz>", program_name);
    eprintln!("                    Bond-distance report");
    eprintln!();
    eprintln!("  {} opt <file.xyz>", program_name);
    eprintln!("                    L-BFGS relaxation, writes opt-<file>.xyz");
    eprintln!();
    eprintln!("  {} config", program_name);
    eprintln!("                    Create an ogupta.cfg settings template");
    eprintln!();
    eprintln!("Supported elements: Fe, Co, Ni");
}
