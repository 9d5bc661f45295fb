//! tether CLI
//!
//! Generates a dependency-injection resolver from extracted declaration facts.

use tetherc::commands::{build_file, explain_error, print_graph};
use tetherc::parse_build_options;

fn main() {
    tetherc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "build" => {
            if args.len() < 3 {
                eprintln!("Usage: tether build <facts.json> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  -o <path>                 Output file (default: container.rs next to the feed)");
                eprintln!("  --cache=<path>            Incremental cache (default: .tether/cache.bin next to the feed)");
                eprintln!("  --no-cache                Do not read or write the cache");
                eprintln!("  --allow-primitive=<name>  Inject null for this primitive parameter type");
                eprintln!("  --crate-root=<path>       Rust path the unit modules live under (default: crate)");
                eprintln!("  --format=json             Print diagnostics as JSON");
                eprintln!("  --color=<mode>            auto, always, never");
                eprintln!("  --error-limit=<n>         Stop collecting errors after n (default: no limit)");
                std::process::exit(1);
            }
            build_file(parse_build_options(&args[2..]));
        }
        "graph" => {
            if args.len() < 3 {
                eprintln!("Usage: tether graph <facts.json> [--allow-primitive=<name>]");
                std::process::exit(1);
            }
            print_graph(parse_build_options(&args[2..]));
        }
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: tether explain <error-code>");
                eprintln!("Example: tether explain E2001");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("tether {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tether - dependency-injection resolver generator");
    println!();
    println!("Usage: tether <command> [options]");
    println!();
    println!("Commands:");
    println!("  build <facts.json>   Generate the resolver module");
    println!("  graph <facts.json>   Print what every type resolves to");
    println!("  explain <code>       Explain an error code");
    println!("  help                 Show this message");
    println!("  version              Show version");
    println!();
    println!("Set RUST_LOG (e.g. RUST_LOG=tether_graph=trace) for pipeline tracing.");
}
