use std::path::PathBuf;

use anyhow::{Context, Result};

const WIDTH: f64 = 1160.0;
const HEIGHT: f64 = 480.0;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: plantafel <plan.json> [out.svg] [--order <order-no>]");
        std::process::exit(1);
    }

    let input = PathBuf::from(&args[1]);
    let mut output = PathBuf::from("plantafel.svg");
    let mut order: Option<String> = None;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--order" {
            order = rest.next().cloned();
        } else {
            output = PathBuf::from(arg);
        }
    }

    let data = std::fs::read(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let plan = plantafel_core::parse_operations(&data)?;
    if plan.skipped_rows > 0 {
        eprintln!("skipped {} rows with unusable timestamps", plan.skipped_rows);
    }

    let svg = match order {
        // Routing view for one order's operation chain.
        Some(order_no) => {
            let chain: Vec<_> = plan
                .operations
                .iter()
                .filter(|op| op.order_no == order_no)
                .cloned()
                .collect();
            let board = plantafel_core::RoutingBoard::default();
            let scene = board.render(&chain);
            plantafel_core::svg::render_svg(&scene.commands, scene.width, scene.height)
        }
        // Default: the machine-lane timeline over all operations.
        None => {
            let store = plantafel_core::SelectionStore::new(plantafel_core::MemoryStore::default());
            let mut board = plantafel_core::PlanBoard::new(store);
            board.resize(WIDTH, HEIGHT);
            board.load_operations(plan.operations);
            let scene = board.render();
            if scene.no_data {
                eprintln!("no operations to display");
            }
            plantafel_core::svg::render_svg(&scene.commands, WIDTH, HEIGHT)
        }
    };

    std::fs::write(&output, svg)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}
