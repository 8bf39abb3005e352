use crate::graph::{GraphBuilder, VertexWeightedGraph, Weight};
use crate::tree_decomposition::TreeDecomposition;
use std::convert::TryFrom;
use std::io;
use std::io::{BufRead, Write};

fn invalid_line(line_number: usize, reason: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("Invalid line {}: {}", line_number, reason),
    )
}

enum CsvLine<'a> {
    /// `a,b`
    Edge(&'a str, &'a str),
    /// `a,,value`
    Attribute(&'a str, &'a str),
}

fn csv_line(line: &str) -> Option<CsvLine<'_>> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
    match fields.as_slice() {
        [a, b] if !a.is_empty() && !b.is_empty() => Some(CsvLine::Edge(*a, *b)),
        [a, "", value] if !a.is_empty() => Some(CsvLine::Attribute(*a, *value)),
        _ => None,
    }
}

/// Non-blank, trimmed lines together with their 1-based line numbers.
fn numbered_lines<T: BufRead>(reader: T) -> impl Iterator<Item = io::Result<(usize, String)>> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|line| (i + 1, line.trim().to_string())))
        .filter(|line| match line {
            Ok((_, line)) => !line.is_empty(),
            Err(_) => true,
        })
}

/// Graph in the `a,b` / `a,,weight` CSV format.
pub struct GraphCsvRead<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<GraphCsvRead<T>> for VertexWeightedGraph {
    type Error = io::Error;

    fn try_from(reader: GraphCsvRead<T>) -> Result<Self, Self::Error> {
        let mut builder = GraphBuilder::new();
        for line in numbered_lines(reader.0) {
            let (line_number, line) = line?;
            match csv_line(&line) {
                Some(CsvLine::Edge(a, b)) => {
                    if a == b {
                        return Err(invalid_line(line_number, "self loop"));
                    }
                    builder.add_edge(a, b);
                }
                Some(CsvLine::Attribute(v, weight)) => {
                    let weight: Weight = weight
                        .parse()
                        .map_err(|_| invalid_line(line_number, "weight is not an integer"))?;
                    builder.set_weight(v, weight);
                }
                None => return Err(invalid_line(line_number, "expected `a,b` or `a,,weight`")),
            }
        }
        Ok(builder.build())
    }
}

/// Decomposition in the `N1,N2` / `N1,,a;b;c` CSV format, with bag vertices
/// resolved against the graph.
pub struct TreeDecompositionCsvRead<'a, T: BufRead>(pub T, pub &'a VertexWeightedGraph);

impl<'a, T: BufRead> TryFrom<TreeDecompositionCsvRead<'a, T>> for TreeDecomposition {
    type Error = io::Error;

    fn try_from(reader: TreeDecompositionCsvRead<'a, T>) -> Result<Self, Self::Error> {
        let TreeDecompositionCsvRead(reader, graph) = reader;
        let mut td = TreeDecomposition::new();
        for line in numbered_lines(reader) {
            let (line_number, line) = line?;
            match csv_line(&line) {
                Some(CsvLine::Edge(a, b)) => {
                    if a == b {
                        return Err(invalid_line(line_number, "self loop"));
                    }
                    let a = td.add_node(a);
                    let b = td.add_node(b);
                    td.add_edge(a, b);
                }
                Some(CsvLine::Attribute(name, bag)) => {
                    let bag = bag
                        .split(';')
                        .map(|v| v.trim())
                        .filter(|v| !v.is_empty())
                        .map(|v| {
                            graph.id(v).ok_or_else(|| {
                                invalid_line(line_number, &format!("unknown vertex {}", v))
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    let id = td.add_node(name);
                    td.set_bag(id, bag);
                }
                None => {
                    return Err(invalid_line(
                        line_number,
                        "expected `N1,N2` or `N1,,a;b;c`",
                    ))
                }
            }
        }
        Ok(td)
    }
}

/// Writes every bag line first, then every tree edge once.
pub struct CsvWriter<'a, W: Write> {
    td: &'a TreeDecomposition,
    graph: &'a VertexWeightedGraph,
    writer: W,
}

impl<'a, W: Write> CsvWriter<'a, W> {
    pub fn new(td: &'a TreeDecomposition, graph: &'a VertexWeightedGraph, writer: W) -> Self {
        Self { td, graph, writer }
    }

    pub fn output(mut self) -> io::Result<()> {
        for node in self.td.nodes() {
            writeln!(
                self.writer,
                "{},,{}",
                node.name(),
                self.graph.names(node.bag()).join(";")
            )?;
        }
        for (a, b) in self.td.edges() {
            writeln!(
                self.writer,
                "{},{}",
                self.td.nodes()[a].name(),
                self.td.nodes()[b].name()
            )?;
        }
        self.writer.flush()
    }
}
