use std::path::PathBuf;

use clap::Parser;

use routesim_node::{report, Node, NodeConfig, NodeError};

#[derive(Parser)]
#[command(name = "routesim-node", about = "Single-router data-plane simulator")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "routesim.toml")]
    config: PathBuf,

    /// Packet input file (overrides the config's `router.input`)
    #[arg(short, long)]
    packets: Option<PathBuf>,
}

fn run(cli: &Cli) -> Result<(), NodeError> {
    let config = NodeConfig::load(&cli.config)?;

    let input = cli
        .packets
        .clone()
        .or_else(|| config.router.input.clone())
        .ok_or(NodeError::NoInputFile)?;

    let mut node = Node::from_config(&config)?;
    println!("{}", report::render_routing_table(node.routing_table()));

    let packets = routesim_node::input::read_packets(&input)?;
    let run_report = node.process(packets);
    println!("{}", report::render_report(&run_report));
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        routesim_node::logging::init_json();
    } else {
        routesim_node::logging::init();
    }

    if let Err(e) = run(&cli) {
        tracing::error!("run failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
