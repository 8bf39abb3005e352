use log::LevelFilter;
use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use structopt::StructOpt;
use treewidth_vc::graph::VertexWeightedGraph;
use treewidth_vc::io::{CsvWriter, GraphCsvRead, TreeDecompositionCsvRead};
use treewidth_vc::log::build_logger_for_level;
use treewidth_vc::solver::{RootSelection, Solver};
use treewidth_vc::tree_decomposition::TreeDecomposition;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "treewidth-vc-cli",
    about = "Computes a minimum weight vertex cover along a given tree decomposition."
)]
struct Opt {
    /// Graph file. One `a,b` edge or `a,,weight` line per row.
    #[structopt(parse(from_os_str))]
    graph: PathBuf,

    /// Tree decomposition file. One `N1,N2` edge or `N1,,a;b;c` bag per row.
    #[structopt(parse(from_os_str))]
    decomposition: PathBuf,

    /// Name of the decomposition node to root at. Defaults to the largest bag.
    #[structopt(long)]
    root: Option<String>,

    /// Do not check the decomposition against the graph.
    #[structopt(long)]
    skip_verify: bool,

    /// Writes the nice tree decomposition to this file.
    #[structopt(long, parse(from_os_str))]
    nice_output: Option<PathBuf>,

    /// Verbose mode (-v, -vv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();
    let level = match opt.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    build_logger_for_level(level);

    let file = File::open(&opt.graph)?;
    let graph = VertexWeightedGraph::try_from(GraphCsvRead(BufReader::new(file)))?;
    let file = File::open(&opt.decomposition)?;
    let mut td =
        TreeDecomposition::try_from(TreeDecompositionCsvRead(BufReader::new(file), &graph))?;

    let root = match opt.root {
        Some(name) => RootSelection::Named(name),
        None => RootSelection::LargestBag,
    };
    let solution = Solver::default()
        .verify(!opt.skip_verify)
        .root(root)
        .solve(&graph, &mut td)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(path) = opt.nice_output {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        CsvWriter::new(&td, &graph, BufWriter::new(file)).output()?;
    }

    println!(
        "Minimum Vertex Cover: {}",
        graph.names(&solution.cover).join(", ")
    );
    println!("Weight: {}", solution.weight);
    Ok(())
}
