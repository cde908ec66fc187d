use clap::Parser;
use pack_calculator::solver::Solver;
use pack_calculator::types::PackSizes;

#[derive(Parser)]
#[command(
    name = "pack_calculator",
    about = "Pick the packs that ship an order with the least overage"
)]
struct Cli {
    /// Available pack sizes (e.g. 250 500 1000)
    #[arg(long = "packs", num_args = 1.., required = true)]
    packs: Vec<u32>,

    /// Number of items ordered
    #[arg(long)]
    quantity: u32,
}

fn main() {
    let cli = Cli::parse();

    let sizes = PackSizes::new(cli.packs).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let arrangement = Solver::new(sizes).solve(cli.quantity).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Packs:");
    for (size, count) in arrangement.packs().rev() {
        println!("  {} x {}", count, size);
    }
    println!();

    let total_items = arrangement.total_items();
    let total_packs = arrangement.total_packs();
    println!(
        "Summary: {} item{} in {} pack{}, {} over",
        total_items,
        if total_items == 1 { "" } else { "s" },
        total_packs,
        if total_packs == 1 { "" } else { "s" },
        total_items - cli.quantity as u64,
    );
}
