//! Input parsing and output writing (spec §6). Whitespace-separated tokens,
//! line breaks are not semantically meaningful (mirrors the original
//! `ifstream >> word` tokenization).

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};

use crate::error::PartitionError;
use crate::hypergraph::CellSpec;

pub struct ParsedDesign {
    pub cells: Vec<CellSpec>,
    pub nets: Vec<Vec<usize>>,
}

struct Tokens<'a> {
    it: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { it: text.split_whitespace() }
    }

    fn next(&mut self) -> Result<&'a str> {
        self.it
            .next()
            .ok_or_else(|| PartitionError::InputError("unexpected end of input".into()).into())
    }

    fn next_usize(&mut self) -> Result<usize> {
        let tok = self.next()?;
        tok.parse()
            .map_err(|_| PartitionError::InputError(format!("expected integer, found {:?}", tok)).into())
    }

    fn next_u32(&mut self) -> Result<u32> {
        let tok = self.next()?;
        tok.parse()
            .map_err(|_| PartitionError::InputError(format!("expected integer, found {:?}", tok)).into())
    }
}

/// Parse the line-oriented cell/net description (spec §6 input format).
pub fn parse_design(text: &str) -> Result<ParsedDesign> {
    let mut tok = Tokens::new(text);

    tok.next().context("reading NumCells keyword")?;
    let num_cells = tok.next_usize().context("reading NumCells value")?;

    let mut cells: Vec<CellSpec> = Vec::with_capacity(num_cells);
    let mut cell_index: HashMap<String, usize> = HashMap::with_capacity(num_cells);
    for _ in 0..num_cells {
        tok.next().context("reading Cell keyword")?;
        let name = tok.next().context("reading cell name")?.to_string();
        let size = tok.next_u32().context("reading cell size")?;
        let idx = cells.len();
        cell_index.insert(name.clone(), idx);
        cells.push(CellSpec { name, size, nets: Vec::new() });
    }

    tok.next().context("reading NumNets keyword")?;
    let num_nets = tok.next_usize().context("reading NumNets value")?;

    let mut nets: Vec<Vec<usize>> = Vec::with_capacity(num_nets);
    for net_idx in 0..num_nets {
        tok.next().context("reading Net keyword")?;
        let net_name = tok.next().context("reading net name")?.to_string();
        let arity = tok.next_usize().context("reading net arity")?;

        let mut members = Vec::with_capacity(arity);
        for _ in 0..arity {
            tok.next().context("reading Cell keyword in net body")?;
            let cell_name = tok.next().context("reading cell name in net body")?;
            let &cell_idx = cell_index.get(cell_name).ok_or_else(|| PartitionError::ReferenceError {
                net: net_name.clone(),
                cell: cell_name.to_string(),
            })?;
            cells[cell_idx].nets.push(net_idx);
            members.push(cell_idx);
        }
        nets.push(members);
    }

    Ok(ParsedDesign { cells, nets })
}

/// Spreadsheet-style base-26 group label (A, B, ..., Z, AA, AB, ...),
/// resolving the §9/§6 open question for K > 26 groups.
pub fn group_label(mut idx: usize) -> String {
    let mut letters = Vec::new();
    loop {
        let rem = (idx % 26) as u8;
        letters.push(b'A' + rem);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII letters only")
}

/// Write the `CutSize` / `Group<letter>` output format (spec §6), with
/// cells inside each group sorted by name length ascending, then
/// lexicographically (spec §8 item 8).
pub fn write_output<W: Write>(mut out: W, cut_size: i64, groups: &[Vec<String>]) -> Result<()> {
    writeln!(out, "CutSize {}", cut_size)?;
    for (idx, members) in groups.iter().enumerate() {
        let mut sorted = members.clone();
        sorted.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        writeln!(out)?;
        writeln!(out, "Group{} {}", group_label(idx), sorted.len())?;
        for name in &sorted {
            writeln!(out, "{}", name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_label_wraps_like_spreadsheet_columns() {
        assert_eq!(group_label(0), "A");
        assert_eq!(group_label(25), "Z");
        assert_eq!(group_label(26), "AA");
        assert_eq!(group_label(27), "AB");
        assert_eq!(group_label(51), "AZ");
        assert_eq!(group_label(52), "BA");
    }

    #[test]
    fn parse_trivial_design() {
        let text = "\
            NumCells 2\n\
            Cell C1 1\n\
            Cell C2 1\n\
            NumNets 1\n\
            Net N1 2\n\
            Cell C1\n\
            Cell C2\n";
        let parsed = parse_design(text).unwrap();
        assert_eq!(parsed.cells.len(), 2);
        assert_eq!(parsed.nets, vec![vec![0, 1]]);
    }

    #[test]
    fn parse_rejects_undeclared_cell_reference() {
        let text = "\
            NumCells 1\n\
            Cell C1 1\n\
            NumNets 1\n\
            Net N1 2\n\
            Cell C1\n\
            Cell C2\n";
        let err = parse_design(text).unwrap_err();
        assert!(err.to_string().contains("C2"));
    }

    #[test]
    fn output_sorts_by_length_then_lexicographic() {
        let mut buf = Vec::new();
        write_output(&mut buf, 1, &[vec!["BB".into(), "A".into(), "AA".into()]]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["CutSize 1", "", "GroupA 3", "A", "AA", "BB"]);
    }
}
